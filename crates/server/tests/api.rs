//! Router tests. Providers are mocked with wiremock so no real API is hit.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use deck_server::{build_router, AppState, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "deckboundary";

fn local_router() -> Router {
    build_router(AppState::from_config(&ServerConfig::default()))
}

fn router_with(config: ServerConfig) -> Router {
    build_router(AppState::from_config(&config))
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/extract-pdf")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn completion(content: &Value) -> Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content.to_string() } }] })
}

/// A PDF whose only page has no content stream.
fn blank_pdf() -> Vec<u8> {
    use lopdf::{dictionary, Document, Object};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A one-page PDF showing `line` in Helvetica.
fn text_pdf(line: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(line)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

mod generate_slides_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_input_is_rejected() {
        let (status, body) = send_json(
            local_router(),
            json_request("/api/generate-slides", json!({ "title": " ", "content": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Either title or content is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-slides")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send_json(local_router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_title_generated_locally_without_key() {
        let (status, body) = send_json(
            local_router(),
            json_request(
                "/api/generate-slides",
                json!({ "title": "Ocean Currents", "inputMethod": "title" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let slides = body["slides"].as_array().unwrap();
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0]["slide"], 1);
        assert_eq!(slides[0]["heading"], "Ocean Currents");
        assert_eq!(slides[1]["heading"], "Key Points");
        assert_eq!(slides[2]["image"], "Ocean Currents conclusion");
    }

    #[tokio::test]
    async fn test_content_generated_locally_is_capped() {
        let content = (1..=8)
            .map(|i| format!("Topic {i}\nThis line explains topic number {i} in enough detail."))
            .collect::<Vec<_>>()
            .join("\n");
        let (status, body) = send_json(
            local_router(),
            json_request(
                "/api/generate-slides",
                json!({ "content": content, "inputMethod": "text" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slides"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_openrouter_slides_are_used() {
        let mock_server = MockServer::start().await;
        let deck = json!({
            "slides": (1..=6).map(|i| json!({
                "heading": format!("AI Slide {i}"),
                "points": ["first", "second"],
                "imageDescription": format!("picture {i}"),
            })).collect::<Vec<_>>()
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header_eq("authorization", "Bearer test-key"))
            .and(header_eq("x-title", "AI Presentation Generator"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(&deck)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let router = router_with(ServerConfig {
            openrouter_api_key: Some("test-key".to_string()),
            openrouter_base_url: mock_server.uri(),
            ..ServerConfig::default()
        });
        let (status, body) = send_json(
            router,
            json_request(
                "/api/generate-slides",
                json!({ "title": "Volcanoes", "inputMethod": "title" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let slides = body["slides"].as_array().unwrap();
        assert_eq!(slides.len(), 4);
        assert_eq!(slides[0]["heading"], "AI Slide 1");
        assert_eq!(slides[3]["image"], "picture 4");
    }

    #[tokio::test]
    async fn test_openrouter_failure_falls_back() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let router = router_with(ServerConfig {
            openrouter_api_key: Some("test-key".to_string()),
            openrouter_base_url: mock_server.uri(),
            ..ServerConfig::default()
        });
        let (status, body) = send_json(
            router,
            json_request(
                "/api/generate-slides",
                json!({ "title": "Volcanoes", "inputMethod": "title" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let slides = body["slides"].as_array().unwrap();
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0]["points"][0], "Introduction to Volcanoes");
    }

    #[tokio::test]
    async fn test_unparsable_ai_reply_falls_back() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "Sure! Here is your deck." } }]
            })))
            .mount(&mock_server)
            .await;

        let router = router_with(ServerConfig {
            openrouter_api_key: Some("test-key".to_string()),
            openrouter_base_url: mock_server.uri(),
            ..ServerConfig::default()
        });
        let (status, body) = send_json(
            router,
            json_request("/api/generate-slides", json!({ "title": "Glaciers" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body["slides"].as_array().unwrap().is_empty());
    }
}

mod extract_pdf_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_field() {
        let (status, body) = send_json(
            local_router(),
            multipart_request("document", "application/pdf", b"%PDF-1.4"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No PDF file provided");
    }

    #[tokio::test]
    async fn test_not_multipart() {
        let (status, body) = send_json(
            local_router(),
            json_request("/api/extract-pdf", json!({ "pdf": "nope" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Failed to parse form data");
    }

    #[tokio::test]
    async fn test_wrong_declared_type() {
        let (status, _) = send_json(
            local_router(),
            multipart_request("pdf", "image/png", b"\x89PNG"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_garbage_bytes() {
        let (status, body) = send_json(
            local_router(),
            multipart_request("pdf", "application/pdf", b"this is not a pdf"),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Failed to parse PDF content");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_pdf_without_text() {
        let (status, body) = send_json(
            local_router(),
            multipart_request("pdf", "application/pdf", &blank_pdf()),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "No text could be extracted from the PDF");
    }

    #[tokio::test]
    async fn test_extracts_text() {
        let (status, body) = send_json(
            local_router(),
            multipart_request("pdf", "application/pdf", &text_pdf("Hello deck world")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Hello deck world");
        assert_eq!(body["pages"], 1);
        assert_eq!(body["info"]["PDFFormatVersion"], "1.5");
    }
}

mod image_tests {
    use super::*;

    fn pexels_photo(id: u64, width: u64, height: u64) -> Value {
        json!({
            "id": id,
            "width": width,
            "height": height,
            "url": format!("https://www.pexels.com/photo/{id}/"),
            "photographer": format!("Photographer {id}"),
            "photographer_url": format!("https://www.pexels.com/@p{id}"),
            "src": {
                "original": format!("https://images.pexels.com/{id}/original.jpg"),
                "large2x": format!("https://images.pexels.com/{id}/large2x.jpg"),
                "large": format!("https://images.pexels.com/{id}/large.jpg"),
                "medium": format!("https://images.pexels.com/{id}/medium.jpg"),
                "small": format!("https://images.pexels.com/{id}/small.jpg")
            },
            "alt": ""
        })
    }

    async fn mock_pexels(photos: Vec<Value>) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("query", "mountain lake"))
            .and(query_param("per_page", "10"))
            .and(query_param("orientation", "landscape"))
            .and(header_eq("authorization", "px-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "per_page": 10,
                "total_results": photos.len(),
                "photos": photos
            })))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn pexels_router(mock_server: &MockServer) -> Router {
        router_with(ServerConfig {
            pexels_api_key: Some("px-key".to_string()),
            pexels_base_url: mock_server.uri(),
            ..ServerConfig::default()
        })
    }

    #[tokio::test]
    async fn test_image_service_uses_pexels() {
        let mock_server = mock_pexels(vec![
            pexels_photo(1, 640, 480),
            pexels_photo(2, 6000, 4000),
            pexels_photo(3, 1920, 1080),
            pexels_photo(4, 100, 100),
        ])
        .await;

        let (status, body) = send_json(
            pexels_router(&mock_server),
            json_request("/api/image-service", json!({ "searchTerm": " mountain lake " })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "pexels");
        assert_eq!(body["searchTerm"], "mountain lake");
        assert_eq!(body["imageUrl"], "https://images.pexels.com/2/large2x.jpg");
        assert_eq!(body["alt"], "mountain lake");
        assert_eq!(body["thumbnails"].as_array().unwrap().len(), 3);
        assert_eq!(body["attribution"]["photographer"], "Photographer 2");
        assert_eq!(body["attribution"]["photographerUrl"], "https://www.pexels.com/@p2");
        assert_eq!(body["attribution"]["sourceUrl"], "https://www.pexels.com/photo/2/");
    }

    #[tokio::test]
    async fn test_image_service_falls_back_on_empty_results() {
        let mock_server = mock_pexels(Vec::new()).await;

        let (status, body) = send_json(
            pexels_router(&mock_server),
            json_request("/api/image-service", json!({ "searchTerm": "mountain lake" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "placeholder");
        assert!(body["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn test_image_service_falls_back_on_provider_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let (status, body) = send_json(
            pexels_router(&mock_server),
            json_request("/api/image-service", json!({ "searchTerm": "mountain lake" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "placeholder");
    }

    #[tokio::test]
    async fn test_image_service_without_key() {
        let (status, body) = send_json(
            local_router(),
            json_request("/api/image-service", json!({ "searchTerm": "Apple orchard" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "placeholder");
        let url = body["imageUrl"].as_str().unwrap();
        // 'A' = 65, 65 % 4 = 1: green
        assert!(url.starts_with("https://placehold.co/800x600/f0fdf4/14532d?text=Apple%20orchard&t="));
        assert!(body.get("attribution").is_none());
    }

    #[tokio::test]
    async fn test_search_term_required() {
        let (status, body) = send_json(
            local_router(),
            json_request("/api/image-service", json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Search term is required");
    }

    #[tokio::test]
    async fn test_pexels_images_lists_top_three() {
        let mock_server = mock_pexels(vec![
            pexels_photo(1, 640, 480),
            pexels_photo(2, 6000, 4000),
            pexels_photo(3, 1920, 1080),
            pexels_photo(4, 100, 100),
        ])
        .await;

        let (status, body) = send_json(
            pexels_router(&mock_server),
            json_request("/api/pexels-images", json!({ "searchTerm": "mountain lake" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "pexels");
        let ids: Vec<u64> = body["photos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_pexels_images_without_key() {
        let (status, body) = send_json(
            local_router(),
            json_request("/api/pexels-images", json!({ "searchTerm": "lake" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Pexels API key not configured");
        assert_eq!(body["searchTerm"], "lake");
    }

    #[tokio::test]
    async fn test_placeholder_endpoint() {
        let (status, body) = send_json(
            local_router(),
            json_request("/api/placeholder-image", json!({ "searchTerm": "data" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "placeholder");
        assert_eq!(body["searchTerm"], "data");
        assert!(body["imageUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://placehold.co/800x600/f0f9ff/0c4a6e?text=data&t="));
    }
}

mod export_tests {
    use super::*;

    fn slides() -> Value {
        json!([
            { "slide": 1, "heading": "Tides & <Moons>", "points": ["Gravity pulls"], "image": "moon" },
            { "slide": 2, "heading": "Summary", "points": ["Key takeaways"], "image": "summary" }
        ])
    }

    #[tokio::test]
    async fn test_export_html() {
        let request = json_request(
            "/api/export-html",
            json!({
                "slides": slides(),
                "theme": "dark",
                "images": { "0": { "imageUrl": "https://img.example/moon.jpg", "alt": "moon", "source": "pexels" } }
            }),
        );
        let response = local_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Tides &amp; &lt;Moons&gt;"));
        assert!(html.contains("https://img.example/moon.jpg"));
        assert!(html.contains("Slide 2 / 2"));
    }

    #[tokio::test]
    async fn test_export_rejects_unknown_theme() {
        let (status, body) = send_json(
            local_router(),
            json_request("/api/export-html", json!({ "slides": slides(), "theme": "neon" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("neon"));
    }

    #[tokio::test]
    async fn test_export_requires_slides() {
        let (status, _) = send_json(
            local_router(),
            json_request("/api/export-html", json!({ "slides": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(local_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

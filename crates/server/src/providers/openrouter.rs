//! OpenRouter chat-completion client used to draft decks.

use deck_core::{Error, InputMethod, Result, Slide, DEFAULT_MAX_SLIDES};
use serde::Deserialize;
use serde_json::json;

use crate::config::{ServerConfig, DEFAULT_OPENROUTER_BASE_URL, DEFAULT_OPENROUTER_MODEL, DEFAULT_SITE_URL};

/// Characters of user content included in the prompt.
const MAX_PROMPT_CONTENT_CHARS: usize = 7000;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 4000;
const APP_TITLE: &str = "AI Presentation Generator";

/// Client for the OpenRouter chat completions API.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    site_url: String,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_OPENROUTER_MODEL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }

    /// Build a client from the server config, if a key is configured.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        let key = config.openrouter_api_key.as_ref()?;
        Some(
            Self::new(key.clone())
                .with_base_url(&config.openrouter_base_url)
                .with_model(&config.openrouter_model)
                .with_site_url(&config.site_url),
        )
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    /// Ask the model for a deck.
    ///
    /// Returns at most [`DEFAULT_MAX_SLIDES`] slides. Any transport failure,
    /// non-2xx status, or reply that is not the expected JSON is an
    /// [`Error::Upstream`].
    pub async fn generate(
        &self,
        title: Option<&str>,
        content: Option<&str>,
        method: InputMethod,
    ) -> Result<Vec<Slide>> {
        let prompt = build_prompt(title, content, method)
            .ok_or_else(|| Error::InvalidInput("Either title or content is required".to_string()))?;

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("OpenRouter request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("OpenRouter API error: {}", status.as_u16())));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Invalid OpenRouter response: {e}")))?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Upstream("OpenRouter returned no message".to_string()))?;

        let slides = parse_slides(&message)?;
        log::debug!("OpenRouter drafted {} slides", slides.len());
        Ok(slides)
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct GeneratedDeck {
    slides: Vec<GeneratedSlide>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedSlide {
    heading: Option<String>,
    #[serde(default)]
    points: Vec<String>,
    image_description: Option<String>,
}

/// Prompt for the request, or `None` when there is nothing to ask about.
fn build_prompt(title: Option<&str>, content: Option<&str>, method: InputMethod) -> Option<String> {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let content = content.filter(|c| !c.trim().is_empty());

    match (method, title, content) {
        (InputMethod::Title, Some(title), _) => Some(format!(
            "Create a presentation about \"{title}\". Generate a JSON response with slides. \
             Each slide should have a heading, 3-5 bullet points, and an image description. \
             The first slide should be an introduction, and the last slide should be a conclusion. \
             Make the content informative and professional."
        )),
        (_, _, Some(content)) => {
            let excerpt: String = content.chars().take(MAX_PROMPT_CONTENT_CHARS).collect();
            Some(format!(
                "Analyze the following content and create a presentation based on it. \
                 Extract key information and organize it into a coherent presentation structure. \
                 Generate a JSON response with slides. Each slide should have a heading, \
                 3-5 bullet points, and an image description.\n\n\
                 Content to analyze:\n{excerpt}\n\n\
                 The JSON should follow this format:\n\
                 {{\n  \"slides\": [\n    {{\n      \"heading\": \"Slide Title\",\n      \
                 \"points\": [\"Point 1\", \"Point 2\", \"Point 3\"],\n      \
                 \"imageDescription\": \"Brief description for image search\"\n    }}\n  ]\n}}\n"
            ))
        }
        (_, Some(title), None) => build_prompt(Some(title), None, InputMethod::Title),
        _ => None,
    }
}

/// Parse the model's JSON reply into slides.
fn parse_slides(message: &str) -> Result<Vec<Slide>> {
    let deck: GeneratedDeck = serde_json::from_str(message)
        .map_err(|e| Error::Upstream(format!("Failed to parse AI response: {e}")))?;

    if deck.slides.is_empty() {
        return Err(Error::Upstream("AI response contained no slides".to_string()));
    }

    Ok(deck
        .slides
        .into_iter()
        .take(DEFAULT_MAX_SLIDES)
        .enumerate()
        .map(|(i, s)| Slide::from_generated(i + 1, s.heading, s.points, s.image_description))
        .collect())
}

//! Clients for the external AI and stock photo services.

pub mod openrouter;
pub mod pexels;

pub use openrouter::OpenRouterClient;
pub use pexels::{PexelsClient, PexelsPhoto};

//! Client for the Google generative-language REST API.
//!
//! Two operations back the create pipeline: composite monument image
//! generation and real-world location inference. Wire types and response
//! interpretation live in [`wire`] so they can be tested on canned payloads
//! without a network.

pub mod client;
pub mod error;
pub mod wire;

pub use client::{GeminiClient, GeminiConfig, GeneratedImage};
pub use error::GeminiError;

// LLM provider clients for AI content enhancement.
//
// The `--use-ai provider/model` flag selects one of the supported chat-completion
// backends; everything downstream talks to the `LlmClient` trait.

pub mod client;
pub mod client_impl;
pub mod factory;

pub use client::{LlmClient, MockLlmClient};
pub use factory::{ModelSpec, Provider};

//! HTTP-level tests for the LLM provider clients, using mockito servers
//! in place of the real endpoints.

use anyhow::Result;

use slim_docgen::llm::client_impl::{OllamaClient, OpenAiClient};
use slim_docgen::llm::LlmClient;

#[tokio::test]
async fn test_openai_client_parses_completion() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices": [{"message": {"role": "assistant", "content": "Enhanced text"}}]}"#,
        )
        .create_async()
        .await;

    let client = OpenAiClient::with_base_url(
        "test-key".to_string(),
        "gpt-4o".to_string(),
        server.url(),
        256,
        0.3,
        30,
    )?;

    let output = client.complete("Improve this.").await?;
    assert_eq!(output, "Enhanced text");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_openai_client_sends_model_and_prompt() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "Improve this."}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "ok"}}]}"#)
        .create_async()
        .await;

    let client = OpenAiClient::with_base_url(
        "k".to_string(),
        "gpt-4o".to_string(),
        server.url(),
        256,
        0.3,
        30,
    )?;
    client.complete("Improve this.").await?;
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_openai_client_surfaces_api_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key"}}"#)
        .create_async()
        .await;

    let client = OpenAiClient::with_base_url(
        "bad-key".to_string(),
        "gpt-4o".to_string(),
        server.url(),
        256,
        0.3,
        30,
    )?;

    let result = client.complete("prompt").await;
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("OpenAI API error"));
    assert!(message.contains("401"));
    Ok(())
}

#[tokio::test]
async fn test_openai_client_rejects_empty_choices() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create_async()
        .await;

    let client = OpenAiClient::with_base_url(
        "k".to_string(),
        "gpt-4o".to_string(),
        server.url(),
        256,
        0.3,
        30,
    )?;

    let result = client.complete("prompt").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("No choices"));
    Ok(())
}

#[tokio::test]
async fn test_ollama_client_parses_chat_response() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "mistral",
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"model": "mistral", "message": {"role": "assistant", "content": "Local output"}, "done": true}"#,
        )
        .create_async()
        .await;

    let client = OllamaClient::new("mistral".to_string(), server.url(), 30)?;
    let output = client.complete("prompt").await?;
    assert_eq!(output, "Local output");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_ollama_client_surfaces_missing_model_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_body(r#"{"error": "model 'mistral' not found"}"#)
        .create_async()
        .await;

    let client = OllamaClient::new("mistral".to_string(), server.url(), 30)?;
    let result = client.complete("prompt").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Ollama API error"));
    Ok(())
}

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url =
        std::env::var("DOC_QA_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

    println!("Health Check:");
    let health_response = client.get(format!("{}/", base_url)).send().await?;
    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    println!("\nUpload:");
    let part = Part::bytes(b"Paris is the capital of France.\n".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")?;
    let upload_response = client
        .post(format!("{}/upload", base_url))
        .multipart(Form::new().part("file", part))
        .send()
        .await?;
    println!("Status: {}", upload_response.status());
    let upload_json: serde_json::Value = upload_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&upload_json)?);

    println!("\nAsk:");
    let ask_payload = json!({
        "filename": "notes.txt",
        "question": "What is the capital of France?",
        "history": []
    });
    let ask_response = client
        .post(format!("{}/ask", base_url))
        .json(&ask_payload)
        .send()
        .await?;
    println!("Status: {}", ask_response.status());
    let ask_json: serde_json::Value = ask_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&ask_json)?);

    Ok(())
}

use {
    anyhow::{Context, Result},
    courier_config::CourierConfig,
    courier_history::{HistoryClient, write_output},
};

fn http_client(config: &CourierConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.http.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build HTTP client")
}

pub async fn greet(config: &CourierConfig) -> Result<()> {
    let http = http_client(config)?;
    let outcome =
        courier_messaging::run_greeting(&http, &config.liveperson, &config.messaging).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub async fn history(config: &CourierConfig, conversation_id: Option<String>) -> Result<()> {
    let http = http_client(config)?;
    let conversation_id = conversation_id.unwrap_or_else(|| config.history.conversation_id.clone());

    let client = HistoryClient::new(http, &config.liveperson, &config.history)?;
    let resp = client.search(&conversation_id).await?;
    write_output(&config.history.output_path, &resp.body).await?;

    eprintln!(
        "{} ({} bytes) written to {}",
        resp.status,
        resp.body.len(),
        config.history.output_path.display()
    );
    if !resp.status.is_success() {
        anyhow::bail!("history search returned {}", resp.status);
    }
    Ok(())
}

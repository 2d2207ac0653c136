use crate::cli::config;
use crate::cli::OutputFormat;
use crate::client::TodoClient;

pub async fn health(server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base_url = config::resolve_server(server, config::load_session()?.as_ref());
    let client = TodoClient::new(base_url.clone());

    let body = client.health().await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
        OutputFormat::Text => {
            let status = body.get("status").and_then(|v| v.as_str()).unwrap_or("unknown");
            println!("{}: {}", base_url, status);
        }
    }
    Ok(())
}

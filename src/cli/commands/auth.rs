use serde_json::json;

use crate::cli::config::{self, Session};
use crate::cli::utils::{output_success, resolve_password};
use crate::cli::OutputFormat;
use crate::client::TodoClient;
use crate::types::AuthResponse;

pub async fn register(
    server: Option<String>,
    email: String,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let base_url = config::resolve_server(server, config::load_session()?.as_ref());
    let password = resolve_password(password)?;

    let mut client = TodoClient::new(base_url);
    let auth = client.register(&email, &password).await?;

    start_session(&client, &auth, &output_format)
}

pub async fn login(
    server: Option<String>,
    email: String,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let base_url = config::resolve_server(server, config::load_session()?.as_ref());
    let password = resolve_password(password)?;

    let mut client = TodoClient::new(base_url);
    let auth = client.login(&email, &password).await?;

    start_session(&client, &auth, &output_format)
}

// Only reached after the server accepted the credentials
fn start_session(client: &TodoClient, auth: &AuthResponse, output_format: &OutputFormat) -> anyhow::Result<()> {
    let session = Session::new(
        client.base_url().to_string(),
        auth.user.email.clone(),
        auth.token.clone(),
    );
    config::save_session(&session)?;

    output_success(
        output_format,
        &format!("{} as {}", auth.message, auth.user.email),
        Some(json!({ "user": auth.user, "server": session.server })),
    )
}

pub fn logout(output_format: OutputFormat) -> anyhow::Result<()> {
    let message = if config::clear_session()? {
        "Logged out"
    } else {
        "No active session"
    };
    output_success(&output_format, message, None)
}

pub fn status(server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = config::load_session()?;
    let base_url = config::resolve_server(server, session.as_ref());

    match (&output_format, session) {
        (OutputFormat::Json, session) => {
            let details = json!({
                "logged_in": session.is_some(),
                "email": session.as_ref().map(|s| s.email.clone()),
                "server": base_url,
                "saved_at": session.as_ref().map(|s| s.saved_at),
            });
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        (OutputFormat::Text, Some(session)) => {
            println!("Logged in as {}", session.email);
            println!("Server: {}", base_url);
            println!("Since: {}", session.saved_at.to_rfc3339());
        }
        (OutputFormat::Text, None) => {
            println!("Not logged in");
            println!("Server: {}", base_url);
        }
    }
    Ok(())
}

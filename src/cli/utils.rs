use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::cli::config::{self, Session};
use crate::cli::OutputFormat;
use crate::client::TodoClient;
use crate::database::Todo;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("{}", message);
        }
    }
    Ok(())
}

pub fn output_todos(output_format: &OutputFormat, todos: &[Todo]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "todos": todos }))?);
        }
        OutputFormat::Text => {
            if todos.is_empty() {
                println!("No todos");
            }
            for todo in todos {
                println!("{}", format_todo(todo));
            }
        }
    }
    Ok(())
}

pub fn output_todo(output_format: &OutputFormat, message: &str, todo: &Todo) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_success(output_format, message, Some(json!({ "todo": todo }))),
        OutputFormat::Text => {
            println!("✓ {}", message);
            println!("{}", format_todo(todo));
            Ok(())
        }
    }
}

pub fn format_todo(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };
    format!("[{}] {:>4}  {}", mark, todo.id, todo.text)
}

/// Use the provided password, or prompt for one on stdin
pub fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        return Err(anyhow::anyhow!("Password is required"));
    }
    Ok(password)
}

/// Client bound to the saved session's token
pub fn session_client(server: Option<String>) -> anyhow::Result<TodoClient> {
    let session: Session = config::load_session()?
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `todo login <email>` first"))?;

    client_for_session(server, session)
}

/// The token is only ever sent to the server that issued it
fn client_for_session(server: Option<String>, session: Session) -> anyhow::Result<TodoClient> {
    let base_url = config::resolve_server(server, Some(&session));

    if base_url.trim_end_matches('/') != session.server.trim_end_matches('/') {
        return Err(anyhow::anyhow!(
            "Saved session belongs to {}, not {}. Run `todo login <email> --server {}` first",
            session.server,
            base_url,
            base_url
        ));
    }

    Ok(TodoClient::new(base_url).with_token(session.token))
}

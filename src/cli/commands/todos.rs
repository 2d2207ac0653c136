use crate::cli::utils::{output_success, output_todo, output_todos, session_client};
use crate::cli::OutputFormat;
use crate::types::{TodoFilter, UpdateTodoRequest};

pub async fn list(server: Option<String>, filter: TodoFilter, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = session_client(server)?;
    let todos = client.list_todos(filter).await?;
    output_todos(&output_format, &todos)
}

pub async fn add(server: Option<String>, text: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = session_client(server)?;
    let todo = client.create_todo(&text).await?;
    output_todo(&output_format, "Todo created", &todo)
}

pub async fn set_completed(
    server: Option<String>,
    id: i64,
    completed: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = session_client(server)?;
    let todo = client.set_completed(id, completed).await?;

    let message = if completed { "Todo completed" } else { "Todo reopened" };
    output_todo(&output_format, message, &todo)
}

pub async fn edit(server: Option<String>, id: i64, text: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = session_client(server)?;
    let patch = UpdateTodoRequest {
        text: Some(text),
        completed: None,
    };
    let todo = client.update_todo(id, &patch).await?;
    output_todo(&output_format, "Todo updated", &todo)
}

pub async fn remove(server: Option<String>, id: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = session_client(server)?;
    client.delete_todo(id).await?;
    output_success(
        &output_format,
        &format!("Todo {} deleted", id),
        Some(serde_json::json!({ "id": id })),
    )
}

//! HTTP client for the todo API.
//!
//! Holds the bearer token returned by `register`/`login` and attaches it to
//! every todo request.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::database::Todo;
use crate::types::{
    AuthResponse, CreateTodoRequest, LoginRequest, MessageResponse, RegisterRequest, TodoFilter,
    UpdateTodoRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Not logged in")]
    MissingToken,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::MissingToken => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(builder.bearer_auth(token))
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        handle_response(response).await
    }

    /// Create an account and keep the issued token
    pub async fn register(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(self.url("/api/auth/register")).json(&body).send().await?;
        let auth: AuthResponse = handle_response(response).await?;

        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Authenticate and keep the issued token
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(self.url("/api/auth/login")).json(&body).send().await?;
        let auth: AuthResponse = handle_response(response).await?;

        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn list_todos(&self, filter: TodoFilter) -> Result<Vec<Todo>, ClientError> {
        let mut request = self.http.get(self.url("/api/todos"));
        if filter != TodoFilter::All {
            request = request.query(&[("filter", filter.as_str())]);
        }

        let response = self.authorized(request)?.send().await?;
        handle_response(response).await
    }

    pub async fn create_todo(&self, text: &str) -> Result<Todo, ClientError> {
        let body = CreateTodoRequest { text: text.to_string() };
        let request = self.http.post(self.url("/api/todos")).json(&body);

        let response = self.authorized(request)?.send().await?;
        handle_response(response).await
    }

    pub async fn update_todo(&self, id: i64, patch: &UpdateTodoRequest) -> Result<Todo, ClientError> {
        let request = self.http.patch(self.url(&format!("/api/todos/{}", id))).json(patch);

        let response = self.authorized(request)?.send().await?;
        handle_response(response).await
    }

    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<Todo, ClientError> {
        self.update_todo(
            id,
            &UpdateTodoRequest {
                text: None,
                completed: Some(completed),
            },
        )
        .await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/api/todos/{}", id)));

        let response = self.authorized(request)?.send().await?;
        let _: MessageResponse = handle_response(response).await?;
        Ok(())
    }
}

/// Decode a success body, or turn the server's `error` field into `ClientError::Api`
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "Request failed".to_string());

        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<T>().await?)
}

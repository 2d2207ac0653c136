use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::DEFAULT_SERVER;

const SESSION_FILE: &str = "session.json";

/// Saved login: where it was made, as whom, and the bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    pub email: String,
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(server: String, email: String, token: String) -> Self {
        Self {
            server,
            email,
            token,
            saved_at: Utc::now(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TODO_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("todo").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Option<Session>> {
    load_session_from(&get_config_dir()?)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?, session)
}

/// Returns whether a session existed
pub fn clear_session() -> anyhow::Result<bool> {
    clear_session_in(&get_config_dir()?)
}

fn load_session_from(dir: &Path) -> anyhow::Result<Option<Session>> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(Some(session))
}

fn save_session_to(dir: &Path, session: &Session) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    fs::write(dir.join(SESSION_FILE), content)?;
    Ok(())
}

fn clear_session_in(dir: &Path) -> anyhow::Result<bool> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(false);
    }

    fs::remove_file(session_file)?;
    Ok(true)
}

/// Explicit flag or env wins, then the saved session's server, then the default
pub fn resolve_server(explicit: Option<String>, session: Option<&Session>) -> String {
    explicit
        .or_else(|| session.map(|s| s.server.clone()))
        .unwrap_or_else(|| DEFAULT_SERVER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("todo-cli-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn session_save_load_clear() {
        let dir = scratch_dir("session");
        let session = Session::new(
            "http://localhost:3000".to_string(),
            "a@x.com".to_string(),
            "tok".to_string(),
        );

        assert_eq!(load_session_from(&dir).unwrap(), None);

        save_session_to(&dir, &session).unwrap();
        assert_eq!(load_session_from(&dir).unwrap(), Some(session));

        assert!(clear_session_in(&dir).unwrap());
        assert!(!clear_session_in(&dir).unwrap());
        assert_eq!(load_session_from(&dir).unwrap(), None);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn server_resolution_order() {
        let session = Session::new("http://saved:1".to_string(), "a@x.com".to_string(), "t".to_string());

        assert_eq!(resolve_server(Some("http://flag:2".to_string()), Some(&session)), "http://flag:2");
        assert_eq!(resolve_server(None, Some(&session)), "http://saved:1");
        assert_eq!(resolve_server(None, None), DEFAULT_SERVER);
    }
}

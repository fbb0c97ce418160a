// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Project ids that ship in example `.env` files and were never filled in.
const PLACEHOLDER_PROJECT_IDS: &[&str] = &["your-project-id", "changeme"];

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firestore project. When absent or a placeholder, the local store is used.
    pub firestore_project_id: Option<String>,
    /// Directory holding the local fallback store
    pub data_dir: PathBuf,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            firestore_project_id: None,
            data_dir: PathBuf::from("./data"),
            frontend_url: "http://localhost:4200".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            firestore_project_id: env::var("FIRESTORE_PROJECT_ID")
                .ok()
                .map(|v| v.trim().to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:4200".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// The Firestore project to connect to, if one is really configured.
    pub fn remote_project(&self) -> Result<&str, ConfigError> {
        let project = self
            .firestore_project_id
            .as_deref()
            .ok_or(ConfigError::Missing("FIRESTORE_PROJECT_ID"))?;

        if project.is_empty()
            || project.starts_with("YOUR_")
            || PLACEHOLDER_PROJECT_IDS.contains(&project)
        {
            return Err(ConfigError::Placeholder(project.to_string()));
        }

        Ok(project)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Placeholder value is not a real project id: {0:?}")]
    Placeholder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("DATA_DIR", "/tmp/gym-tracker-test");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/gym-tracker-test"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_remote_project_rejects_placeholders() {
        let mut config = Config::test_default();
        assert!(matches!(
            config.remote_project(),
            Err(ConfigError::Missing(_))
        ));

        for placeholder in ["", "YOUR_PROJECT_ID", "your-project-id"] {
            config.firestore_project_id = Some(placeholder.to_string());
            assert!(matches!(
                config.remote_project(),
                Err(ConfigError::Placeholder(_))
            ));
        }

        config.firestore_project_id = Some("gym-tracker-prod".to_string());
        assert_eq!(config.remote_project().unwrap(), "gym-tracker-prod");
    }
}

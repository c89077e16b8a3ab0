use std::fs;
use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;

use super::ConfigError;

/// Application and account identity used to open a Reddit session.
#[derive(Debug)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub username: String,
    pub password: SecretString,
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(rename = "Application", alias = "application")]
    application: ApplicationSection,
    #[serde(rename = "Redditor", alias = "redditor")]
    redditor: RedditorSection,
}

#[derive(Deserialize)]
struct ApplicationSection {
    #[serde(alias = "ID")]
    id: String,
    #[serde(alias = "Secret")]
    secret: String,
}

#[derive(Deserialize)]
struct RedditorSection {
    #[serde(alias = "Username")]
    username: String,
    #[serde(alias = "Password")]
    password: String,
}

impl Credentials {
    /// Read the credential store at `path`.
    ///
    /// ```toml
    /// [Application]
    /// id = "client-id"
    /// secret = "client-secret"
    ///
    /// [Redditor]
    /// username = "bot"
    /// password = "hunter2"
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: CredentialsFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let required = [
            ("Application.id", &file.application.id),
            ("Application.secret", &file.application.secret),
            ("Redditor.username", &file.redditor.username),
            ("Redditor.password", &file.redditor.password),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::MissingKey {
                path: path.to_path_buf(),
                key: (*key).to_string(),
            });
        }

        Ok(Self {
            client_id: file.application.id.trim().to_string(),
            client_secret: SecretString::from(file.application.secret),
            username: file.redditor.username.trim().to_string(),
            password: SecretString::from(file.redditor.password),
        })
    }
}

//! OAuth credentials and token cache.
//!
//! The interactive consent flow is out of scope: the token cache must be
//! provisioned before the first run. Expired access tokens are refreshed
//! against the Google token endpoint when a refresh token is present, and
//! the cache file is rewritten after each refresh.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{DriveError, DriveResult};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Tokens within this window of expiry are refreshed eagerly.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// OAuth client id/secret pair from the client secrets file.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Google client secrets files nest the credentials under `installed` (for
/// desktop apps) or `web`.
#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<Credentials>,
    web: Option<Credentials>,
}

impl Credentials {
    pub fn from_file(path: &Path) -> DriveResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DriveError::io(path.display().to_string(), e))?;
        let parsed: ClientSecretsFile = serde_json::from_str(&raw).map_err(|e| {
            DriveError::Auth(format!(
                "invalid client secrets file {}: {}",
                path.display(),
                e
            ))
        })?;
        parsed.installed.or(parsed.web).ok_or_else(|| {
            DriveError::Auth(format!(
                "client secrets file {} has neither an \"installed\" nor a \"web\" section",
                path.display()
            ))
        })
    }
}

/// Cached authorization token, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Usable without a refresh: not expired (minus leeway). A token with no
    /// recorded expiry is assumed valid.
    fn is_valid(&self) -> bool {
        match self.expiry {
            Some(expiry) => Utc::now() + chrono::Duration::seconds(EXPIRY_LEEWAY_SECS) < expiry,
            None => true,
        }
    }
}

/// Shape of the token endpoint's refresh response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Supplies a valid access token to the Drive client, refreshing and
/// re-persisting the cache as needed.
pub struct Authenticator {
    credentials: Credentials,
    token_path: PathBuf,
    http: Client,
    token: Mutex<StoredToken>,
}

impl Authenticator {
    /// Load the client secrets and token cache. A missing or unreadable
    /// token cache is fatal; consent must happen out of band.
    pub fn from_files(credentials_path: &Path, token_path: &Path) -> DriveResult<Self> {
        let credentials = Credentials::from_file(credentials_path)?;
        let raw = std::fs::read_to_string(token_path).map_err(|e| {
            DriveError::Auth(format!(
                "cannot read token cache {}: {}; provision it before running",
                token_path.display(),
                e
            ))
        })?;
        let token: StoredToken = serde_json::from_str(&raw).map_err(|e| {
            DriveError::Auth(format!("invalid token cache {}: {}", token_path.display(), e))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Authenticator {
            credentials,
            token_path: token_path.to_path_buf(),
            http,
            token: Mutex::new(token),
        })
    }

    /// Current access token, refreshed through the token endpoint when the
    /// cached one is about to expire.
    pub async fn access_token(&self) -> DriveResult<String> {
        let mut token = self.token.lock().await;
        if token.is_valid() {
            return Ok(token.access_token.clone());
        }

        let refresh_token = token.refresh_token.clone().ok_or_else(|| {
            DriveError::Auth(
                "cached token is expired and has no refresh token; re-provision the token cache"
                    .to_string(),
            )
        })?;

        tracing::debug!("Refreshing access token");
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = self.http.post(TOKEN_ENDPOINT).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DriveError::Auth(format!(
                "token refresh failed with status {}: {}",
                status, body
            )));
        }

        let refreshed: TokenResponse = response.json().await?;
        token.access_token = refreshed.access_token;
        token.expiry = Some(Utc::now() + chrono::Duration::seconds(refreshed.expires_in));
        if refreshed.refresh_token.is_some() {
            token.refresh_token = refreshed.refresh_token;
        }
        self.persist(&token)?;

        Ok(token.access_token.clone())
    }

    fn persist(&self, token: &StoredToken) -> DriveResult<()> {
        let raw = serde_json::to_string_pretty(token)
            .map_err(|e| DriveError::Auth(format!("cannot serialize token cache: {}", e)))?;
        std::fs::write(&self.token_path, raw)
            .map_err(|e| DriveError::io(self.token_path.display().to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_secrets(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("credentials.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_credentials_from_installed_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(
            dir.path(),
            r#"{"installed": {"client_id": "id1", "client_secret": "secret1"}}"#,
        );

        let creds = Credentials::from_file(&path).unwrap();
        assert_eq!(creds.client_id, "id1");
        assert_eq!(creds.client_secret, "secret1");
    }

    #[test]
    fn test_credentials_from_web_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(
            dir.path(),
            r#"{"web": {"client_id": "id2", "client_secret": "secret2"}}"#,
        );

        let creds = Credentials::from_file(&path).unwrap();
        assert_eq!(creds.client_id, "id2");
    }

    #[test]
    fn test_credentials_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_secrets(dir.path(), r#"{"other": {}}"#);
        assert!(matches!(
            Credentials::from_file(&path),
            Err(DriveError::Auth(_))
        ));
    }

    #[test]
    fn test_token_validity_window() {
        let fresh = StoredToken {
            access_token: "t".to_string(),
            refresh_token: None,
            expiry: Some(Utc::now() + chrono::Duration::hours(1)),
        };
        assert!(fresh.is_valid());

        let stale = StoredToken {
            access_token: "t".to_string(),
            refresh_token: None,
            expiry: Some(Utc::now() + chrono::Duration::seconds(EXPIRY_LEEWAY_SECS / 2)),
        };
        assert!(!stale.is_valid());

        let no_expiry = StoredToken {
            access_token: "t".to_string(),
            refresh_token: None,
            expiry: None,
        };
        assert!(no_expiry.is_valid());
    }

    #[test]
    fn test_authenticator_requires_token_cache() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = write_secrets(
            dir.path(),
            r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
        );

        let missing = dir.path().join("token.json");
        assert!(matches!(
            Authenticator::from_files(&secrets, &missing),
            Err(DriveError::Auth(_))
        ));

        fs::write(
            &missing,
            r#"{"access_token": "abc", "refresh_token": "def"}"#,
        )
        .unwrap();
        assert!(Authenticator::from_files(&secrets, &missing).is_ok());
    }
}

//! Stored OAuth credentials for the Blogger API.
//!
//! The token file is JSON. `access_token` (or `token`, as Google's
//! authorized-user files name it) is what gets sent. `refresh_token`,
//! `client_id` and `client_secret` together make the token refreshable and
//! `expiry` (RFC 3339) says when it runs out. Unknown fields survive a rewrite.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{BlogError, Result, truncate_chars};

/// Tokens this close to expiry are refreshed before use
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default, alias = "token")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("expiry", &self.expiry)
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl StoredCredentials {
    pub fn access_token(&self) -> SecretString {
        SecretString::from(self.access_token.trim().to_string())
    }

    pub fn has_access_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// Expired, or expiring within the skew window. No `expiry` means valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS))
    }

    pub fn can_refresh(&self) -> bool {
        present(&self.refresh_token).is_some()
            && present(&self.client_id).is_some()
            && present(&self.client_secret).is_some()
    }

    /// Exchange the refresh token for a new access token at `token_uri`
    pub async fn refresh(&mut self, client: &reqwest::Client, token_uri: &str) -> Result<()> {
        let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
            present(&self.refresh_token),
            present(&self.client_id),
            present(&self.client_secret),
        ) else {
            return Err(BlogError::Publish(
                "stored credentials have no refresh_token/client_id/client_secret".to_string(),
            ));
        };

        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        let response = client.post(token_uri).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogError::Publish(format!(
                "Token refresh returned {}: {}",
                status,
                truncate_chars(&body, 200)
            )));
        }

        let token: TokenResponse = response.json().await?;
        if token.access_token.trim().is_empty() {
            return Err(BlogError::Publish(
                "Token refresh returned no access_token".to_string(),
            ));
        }

        self.access_token = token.access_token;
        if let Some(rotated) = token.refresh_token.filter(|t| !t.trim().is_empty()) {
            self.refresh_token = Some(rotated);
        }
        self.expiry = token
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        Ok(())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Token file on disk
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file is missing or holds neither an access nor a refresh token
    pub fn load(&self) -> Result<Option<StoredCredentials>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let credentials: StoredCredentials = serde_json::from_str(&json)?;
        if !credentials.has_access_token() && present(&credentials.refresh_token).is_none() {
            return Ok(None);
        }
        Ok(Some(credentials))
    }

    /// Rewrite the token file (temp file, then rename)
    pub fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(credentials)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "Credentials saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_or_empty() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("token.json"));
        assert!(store.load().unwrap().is_none());

        std::fs::write(store.path(), r#"{"access_token": ""}"#).unwrap();
        assert!(store.load().unwrap().is_none());

        std::fs::write(store.path(), r#"{"access_token": "", "refresh_token": "r"}"#).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_accepts_google_token_field() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("token.json"));
        std::fs::write(
            store.path(),
            r#"{"token": "ya29.a", "refresh_token": "1//r", "client_id": "id", "client_secret": "s",
                "expiry": "2026-01-05T09:00:00Z", "scopes": ["https://www.googleapis.com/auth/blogger"]}"#,
        )
        .unwrap();

        let credentials = store.load().unwrap().unwrap();
        assert_eq!(credentials.access_token().expose_secret(), "ya29.a");
        assert!(credentials.can_refresh());
        assert!(credentials.extra.contains_key("scopes"));
    }

    #[test]
    fn test_expiry_with_skew() {
        let now = Utc::now();
        let mut credentials = StoredCredentials {
            access_token: "a".into(),
            ..Default::default()
        };
        assert!(!credentials.is_expired(now));

        credentials.expiry = Some(now + Duration::seconds(30));
        assert!(credentials.is_expired(now));

        credentials.expiry = Some(now + Duration::hours(1));
        assert!(!credentials.is_expired(now));
    }

    #[test]
    fn test_can_refresh_needs_all_fields() {
        let credentials = StoredCredentials {
            refresh_token: Some("r".into()),
            client_id: Some("id".into()),
            client_secret: Some("  ".into()),
            ..Default::default()
        };
        assert!(!credentials.can_refresh());
    }

    #[test]
    fn test_save_keeps_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("nested/token.json"));
        let mut credentials = StoredCredentials {
            access_token: "a".into(),
            ..Default::default()
        };
        credentials
            .extra
            .insert("scopes".into(), serde_json::json!(["blogger"]));

        store.save(&credentials).unwrap();
        let reloaded = store.load().unwrap().unwrap();
        assert_eq!(reloaded.extra["scopes"][0], "blogger");
        assert!(!dir.path().join("nested/token.json.tmp").exists());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = StoredCredentials {
            access_token: "ya29.secret".into(),
            client_secret: Some("shh".into()),
            ..Default::default()
        };
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("ya29.secret"));
        assert!(!debug.contains("shh"));
    }
}

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

use super::error::SheetsError;

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
// Refresh slightly before the remote expiry to avoid using a stale token.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Service-account credentials JSON as downloaded from the cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SheetsError::Credentials(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| SheetsError::Credentials(format!("invalid credentials JSON: {}", e)))
    }
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Exchanges a signed service-account JWT for a bearer token and caches it
/// until shortly before expiry.
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(key: ServiceAccountKey) -> Result<Self, SheetsError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SheetsError::Credentials(format!("invalid private key: {}", e)))?;
        Ok(Self {
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Current bearer token, minting a fresh one when the cache is empty
    /// or about to expire.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, SheetsError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(token.access_token.clone());
            }
        }

        let token_uri = self.key.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
        let claims = JwtClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: token_uri,
            iat: now,
            exp: now + 3600,
        };
        let assertion = encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| SheetsError::Credentials(format!("failed to sign token request: {}", e)))?;

        let response = http
            .post(token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: format!("token exchange failed: {}", body),
            });
        }

        let token: TokenResponse = response.json().await?;
        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: now + token.expires_in,
        });

        Ok(access_token)
    }
}

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::models::auth::Claims;

/// Bearer token issued by POST /auth/login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    raw: String,
    username: Option<String>,
    expires_at: Option<i64>,
    readable: bool,
}

impl AuthToken {
    /// Wrap a raw token, reading its claims when possible. The client never
    /// holds the signing secret, so the signature is not checked here.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match read_claims(&raw) {
            Ok(claims) => Self {
                raw,
                username: claims.sub,
                expires_at: claims.exp,
                readable: true,
            },
            Err(e) => {
                tracing::debug!("Token claims unreadable: {}", e);
                Self {
                    raw,
                    username: None,
                    expires_at: None,
                    readable: false,
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// An unreadable token counts as expired; a token without `exp` never expires.
    pub fn is_expired_at(&self, now: i64) -> bool {
        if !self.readable {
            return true;
        }
        self.expires_at.is_some_and(|exp| exp < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

fn read_claims(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Who the client is talking to the backend as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(AuthToken),
}

impl Session {
    pub fn from_token(raw: Option<String>) -> Self {
        match raw {
            Some(t) if !t.trim().is_empty() => Session::Authenticated(AuthToken::new(t.trim())),
            _ => Session::Anonymous,
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        match self {
            Session::Authenticated(token) => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Persists the session token between CLI invocations.
pub struct TokenStore;

impl TokenStore {
    pub fn load(path: &Path) -> anyhow::Result<Session> {
        if !path.exists() {
            return Ok(Session::Anonymous);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading token file {}", path.display()))?;
        Ok(Session::from_token(Some(raw)))
    }

    pub fn save(path: &Path, token: &AuthToken) -> anyhow::Result<()> {
        fs::write(path, token.as_str())
            .with_context(|| format!("Writing token file {}", path.display()))?;
        Ok(())
    }

    pub fn clear(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Removing token file {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn signed_token(sub: &str, exp: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: Some(sub.into()),
        exp: Some(exp),
        iat: Some(exp - 3600),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_claims_without_the_secret() {
        let token = AuthToken::new(signed_token("marta", 2_000));
        assert_eq!(token.username(), Some("marta"));
        assert!(!token.is_expired_at(1_999));
        assert!(token.is_expired_at(2_001));
    }

    #[test]
    fn garbage_token_counts_as_expired() {
        let token = AuthToken::new("not-a-jwt");
        assert!(token.is_expired_at(0));
        assert_eq!(token.as_str(), "not-a-jwt");
    }

    #[test]
    fn blank_token_is_anonymous() {
        assert_eq!(Session::from_token(Some("  \n".into())), Session::Anonymous);
        assert_eq!(Session::from_token(None), Session::Anonymous);
        assert!(Session::from_token(Some("abc".into())).is_authenticated());
    }

    #[test]
    fn token_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("superlista-token-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("token");

        assert_eq!(TokenStore::load(&path).unwrap(), Session::Anonymous);

        let token = AuthToken::new(signed_token("marta", i64::MAX / 2));
        TokenStore::save(&path, &token).unwrap();
        assert_eq!(TokenStore::load(&path).unwrap(), Session::Authenticated(token));

        TokenStore::clear(&path).unwrap();
        assert!(!path.exists());
        fs::remove_dir_all(&dir).ok();
    }
}

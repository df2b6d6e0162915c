//! Admin token generated once and kept in a plaintext secret file.

use crate::error::RouletteError;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Number of random bytes in a generated token (64 hex chars).
const TOKEN_BYTES: usize = 32;

/// Shared secret that unlocks the admin endpoint.
pub struct AdminToken {
    token: SecretString,
}

impl AdminToken {
    /// Wrap an existing token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }

    /// Read the token from `path`, generating and writing a new one if the
    /// file does not exist yet.
    pub async fn load_or_create(path: &Path) -> Result<Self, RouletteError> {
        if path.exists() {
            let contents = fs::read_to_string(path).await?;
            let token = contents.lines().next().unwrap_or_default().trim().to_string();

            if !token.is_empty() {
                info!("Loaded admin token from {:?}", path);
                return Ok(Self::new(token));
            }
        }

        info!("Creating admin token file at {:?}", path);
        let token = generate_token();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, &token).await?;

        Ok(Self::new(token))
    }

    /// Check a token supplied with a request.
    pub fn verify(&self, provided: Option<&str>) -> bool {
        match provided {
            Some(provided) => hash_secret(provided) == hash_secret(self.token.expose_secret()),
            None => false,
        }
    }

    /// The raw token value, for startup logging.
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Generate a fresh hex-encoded random token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a secret using SHA-256.
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_hash_secret() {
        let hash1 = hash_secret("test");
        let hash2 = hash_secret("test");
        let hash3 = hash_secret("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_verify() {
        let token = AdminToken::new("s3cret");

        assert!(token.verify(Some("s3cret")));
        assert!(!token.verify(Some("wrong")));
        assert!(!token.verify(Some("")));
        assert!(!token.verify(None));
    }

    #[tokio::test]
    async fn test_load_or_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("admintoken.secret");

        let created = AdminToken::load_or_create(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(created.expose().len(), 64);

        let loaded = AdminToken::load_or_create(&path).await.unwrap();
        assert_eq!(loaded.expose(), created.expose());
    }

    #[tokio::test]
    async fn test_load_existing_uses_first_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("admintoken.secret");
        std::fs::write(&path, "abc123\nignored\n").unwrap();

        let token = AdminToken::load_or_create(&path).await.unwrap();
        assert!(token.verify(Some("abc123")));
    }

    #[tokio::test]
    async fn test_empty_file_is_regenerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("admintoken.secret");
        std::fs::write(&path, "").unwrap();

        let token = AdminToken::load_or_create(&path).await.unwrap();
        assert_eq!(token.expose().len(), 64);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), token.expose());
    }
}

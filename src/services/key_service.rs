use crate::utils::error::{LauncherError, Result};
use ssh_key::{HashAlg, PrivateKey};
use std::path::Path;

/// Summary of a private key, safe to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub algorithm: String,
    pub fingerprint: String,
    pub comment: String,
    pub encrypted: bool,
}

/// Reads and checks private keys handed to the engine
pub struct KeyService;

impl KeyService {
    /// Parse an OpenSSH private key and describe it
    pub fn inspect(pem: &str) -> Result<KeyInfo> {
        let key = PrivateKey::from_openssh(pem.trim())
            .map_err(|e| LauncherError::InvalidKey(e.to_string()))?;

        Ok(KeyInfo {
            algorithm: key.algorithm().as_str().to_string(),
            fingerprint: key.public_key().fingerprint(HashAlg::Sha256).to_string(),
            comment: key.comment().to_string(),
            encrypted: key.is_encrypted(),
        })
    }

    /// Load a private key file, returning its text and a summary
    pub async fn read_private_key(path: &Path) -> Result<(String, KeyInfo)> {
        let pem = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LauncherError::KeyFileNotFound(path.display().to_string()),
                _ => e.into(),
            })?;

        let info = Self::inspect(&pem)?;
        tracing::info!(
            "Loaded {} key {} from {}",
            info.algorithm,
            info.fingerprint,
            path.display()
        );
        Ok((pem, info))
    }
}

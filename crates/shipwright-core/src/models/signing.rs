//! Android signing identity models.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Android keystore type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreType {
    Jks,
    Pkcs12,
}

impl KeystoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl std::str::FromStr for KeystoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jks" => Ok(KeystoreType::Jks),
            "pkcs12" => Ok(KeystoreType::Pkcs12),
            _ => Err(format!("Unknown keystore type: {}", s)),
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credential set used to sign a release package.
///
/// Passwords stay inside [`SecretString`] and are only readable from within
/// this crate. `Debug` never prints them.
pub struct SigningIdentity {
    name: String,
    store_file: PathBuf,
    store_password: SecretString,
    key_alias: String,
    key_password: SecretString,
}

impl SigningIdentity {
    pub fn new(
        name: impl Into<String>,
        store_file: impl Into<PathBuf>,
        store_password: SecretString,
        key_alias: impl Into<String>,
        key_password: SecretString,
    ) -> Self {
        Self {
            name: name.into(),
            store_file: store_file.into(),
            store_password,
            key_alias: key_alias.into(),
            key_password,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store_file(&self) -> &Path {
        &self.store_file
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub(crate) fn store_password(&self) -> &SecretString {
        &self.store_password
    }

    pub(crate) fn key_password(&self) -> &SecretString {
        &self.key_password
    }

    /// Names of credential fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_file.as_os_str().is_empty() {
            missing.push("store_file");
        }
        if self.store_password.expose_secret().is_empty() {
            missing.push("store_password");
        }
        if self.key_alias.trim().is_empty() {
            missing.push("key_alias");
        }
        if self.key_password.expose_secret().is_empty() {
            missing.push("key_password");
        }
        missing
    }

    /// Compares every field, including the secrets, without exposing them.
    pub(crate) fn same_material(&self, other: &SigningIdentity) -> bool {
        self.name == other.name
            && self.store_file == other.store_file
            && self.key_alias == other.key_alias
            && self.store_password.expose_secret() == other.store_password.expose_secret()
            && self.key_password.expose_secret() == other.key_password.expose_secret()
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("name", &self.name)
            .field("store_file", &self.store_file)
            .field("store_password", &"[REDACTED]")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(alias: &str, key_password: &str) -> SigningIdentity {
        SigningIdentity::new(
            "release",
            "/keys/upload-keystore.jks",
            SecretString::from("store-secret".to_string()),
            alias,
            SecretString::from(key_password.to_string()),
        )
    }

    #[test]
    fn test_missing_fields_reports_empty_credentials() {
        assert!(identity("upload", "key-secret").missing_fields().is_empty());
        assert_eq!(identity("", "key-secret").missing_fields(), vec!["key_alias"]);
        assert_eq!(identity("upload", "").missing_fields(), vec!["key_password"]);
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let rendered = format!("{:?}", identity("upload", "key-secret"));
        assert!(rendered.contains("upload"));
        assert!(!rendered.contains("store-secret"));
        assert!(!rendered.contains("key-secret"));
    }

    #[test]
    fn test_keystore_type_from_str() {
        assert_eq!("JKS".parse::<KeystoreType>().unwrap(), KeystoreType::Jks);
        assert_eq!("pkcs12".parse::<KeystoreType>().unwrap(), KeystoreType::Pkcs12);
        assert!("bks".parse::<KeystoreType>().is_err());
    }
}

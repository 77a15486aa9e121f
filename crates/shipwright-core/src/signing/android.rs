//! Android keystore inspection and key.properties generation.
//!
//! The key.properties file is read by the Gradle build script to configure
//! the release signing config.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use crate::error::{ConfigError, Result};
use crate::models::KeystoreType;
use crate::resolver::SigningHandle;

/// Detects the keystore type from its magic bytes.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    // JKS files start with 0xFEEDFEED; PKCS12 is an ASN.1 SEQUENCE (0x30)
    if data.len() >= 4 && data[..4] == [0xFE, 0xED, 0xFE, 0xED] {
        return KeystoreType::Jks;
    }

    KeystoreType::Pkcs12
}

/// Reads the handle's keystore header and detects its type.
pub fn read_keystore_type(handle: &SigningHandle) -> Result<KeystoreType> {
    let file = std::fs::File::open(handle.store_file())
        .map_err(|e| ConfigError::Signing(format!("Failed to open keystore: {}", e)))?;

    let mut header = Vec::with_capacity(4);
    file.take(4)
        .read_to_end(&mut header)
        .map_err(|e| ConfigError::Signing(format!("Failed to read keystore: {}", e)))?;

    Ok(detect_keystore_type(&header))
}

/// Generates key.properties content for Flutter/Gradle.
///
/// Values are escaped for `java.util.Properties`, which Gradle uses to load
/// the file as ISO-8859-1. The buffer is zeroed when dropped.
pub fn generate_key_properties(handle: &SigningHandle) -> Zeroizing<String> {
    let identity = handle.identity();
    let store_file = identity.store_file().to_string_lossy();
    let entries = [
        ("storePassword", identity.store_password().expose_secret()),
        ("keyPassword", identity.key_password().expose_secret()),
        ("keyAlias", identity.key_alias()),
        ("storeFile", store_file.as_ref()),
    ];

    // Escaping grows a value by at most 6x; reserve up front so no secret is
    // left behind in a reallocated buffer.
    let capacity = entries
        .iter()
        .map(|(key, value)| key.len() + 2 + value.len() * 6)
        .sum();
    let mut content = Zeroizing::new(String::with_capacity(capacity));

    for (key, value) in entries {
        content.push_str(key);
        content.push('=');
        push_escaped_value(&mut content, value);
        content.push('\n');
    }

    content
}

/// Appends `value` escaped as a `java.util.Properties` value.
fn push_escaped_value(out: &mut String, value: &str) {
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\t' => out.push_str(r"\t"),
            '\u{c}' => out.push_str(r"\f"),
            ' ' if i == 0 => out.push_str(r"\ "),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!(r"\u{:04X}", unit));
                }
            }
        }
    }
}

/// Writes key.properties into `<project>/android/`.
///
/// The file is created owner-only and removed again if writing fails.
pub fn write_key_properties(project_dir: &Path, handle: &SigningHandle) -> Result<PathBuf> {
    let android_dir = project_dir.join("android");

    if !android_dir.is_dir() {
        return Err(ConfigError::Signing(
            "Android directory not found in project".to_string(),
        ));
    }

    let key_properties_path = android_dir.join("key.properties");
    let content = generate_key_properties(handle);

    // An existing file may carry wider permissions; replace it
    if key_properties_path.exists() {
        std::fs::remove_file(&key_properties_path).map_err(|e| {
            ConfigError::Signing(format!("Failed to replace key.properties: {}", e))
        })?;
    }

    let mut file = create_private_file(&key_properties_path)
        .map_err(|e| ConfigError::Signing(format!("Failed to create key.properties: {}", e)))?;

    if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = std::fs::remove_file(&key_properties_path);
        return Err(ConfigError::Signing(format!(
            "Failed to write key.properties: {}",
            e
        )));
    }

    tracing::debug!(
        "Wrote key.properties for identity '{}' to {}",
        handle.name(),
        key_properties_path.display()
    );

    Ok(key_properties_path)
}

/// Removes key.properties from the project. Returns whether a file was removed.
pub fn cleanup_key_properties(project_dir: &Path) -> Result<bool> {
    let key_properties_path = project_dir.join("android/key.properties");

    if !key_properties_path.exists() {
        return Ok(false);
    }

    std::fs::remove_file(&key_properties_path)
        .map_err(|e| ConfigError::Signing(format!("Failed to remove key.properties: {}", e)))?;
    tracing::debug!("Removed key.properties from {}", key_properties_path.display());

    Ok(true)
}

#[cfg(unix)]
fn create_private_file(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
}

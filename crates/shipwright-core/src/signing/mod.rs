//! Code signing output for the packaging step.
//!
//! This is the only module that reads credentials out of a
//! [`SigningHandle`](crate::resolver::SigningHandle):
//! - Android keystore type detection
//! - key.properties generation, writing and cleanup

pub mod android;

pub use android::*;

/// Masks a value for display, keeping at most the first and last two characters.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len().max(3));
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}...{}", head, tail)
}

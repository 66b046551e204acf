//! Dev-only request logging.
//!
//! Enabled by NORMALIZER_DEV_LOG=1 in a dev environment (debug build, or
//! SHUTTLE_ENV in {local, development, dev}). Raw text is never logged, only a
//! short SHA-256 based id plus sizes.

use sha2::{Digest, Sha256};
use tracing::info;

pub const ENV_DEV_LOG: &str = "NORMALIZER_DEV_LOG";

pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// First 6 bytes of SHA-256, hex encoded.
pub fn anon_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Log one normalization request (anonymized).
pub fn log_normalized(event: &str, text: &str, tokens_out: usize) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    info!(
        target: "normalizer",
        %id,
        event,
        chars_in = text.chars().count(),
        tokens_out,
    );
}

use chrono::{TimeZone, Utc};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{PatientProfile, ShareSettings};

/// Host used when building shareable links.
pub const SHARE_LINK_HOST: &str = "https://myhealth.app";

/// Share grants always expire 24 hours after generation.
pub const SHARE_TTL_SECS: u64 = 24 * 60 * 60;

const TOKEN_LEN: usize = 13;
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Snapshot embedded in the dynamic share QR.
///
/// The token is single-use in spirit only; nothing validates it server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub patient: String,
    pub curp: String,
    pub expires: String,
    pub permissions: ShareSettings,
    pub token: String,
}

impl SharePayload {
    /// Build a payload for the current share settings with a fresh token and
    /// a fixed now+24h expiry.
    pub fn new(
        profile: &PatientProfile,
        permissions: ShareSettings,
        now_ms: u64,
        rng: &mut dyn RngCore,
    ) -> Self {
        Self {
            patient: profile.name.clone(),
            curp: profile.curp.clone(),
            expires: rfc3339_from_ms(now_ms + SHARE_TTL_SECS * 1_000),
            permissions,
            token: generate_token(rng),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(AppError::from)
    }
}

/// Random lowercase alphanumeric token, 13 characters like the web client's.
pub fn generate_token(rng: &mut dyn RngCore) -> String {
    (0..TOKEN_LEN)
        .map(|_| {
            let index = rng.next_u32() as usize % TOKEN_ALPHABET.len();
            TOKEN_ALPHABET[index] as char
        })
        .collect()
}

/// Shareable deep link for a freshly generated token.
pub fn share_link(token: &str) -> String {
    format!("{SHARE_LINK_HOST}/share/{token}")
}

fn rfc3339_from_ms(epoch_ms: u64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms as i64).single() {
        Some(ts) => ts.to_rfc3339(),
        None => String::from("1970-01-01T00:00:00+00:00"),
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::*;

    #[test]
    fn token_is_thirteen_lowercase_alphanumerics() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        let token = generate_token(&mut rng);
        assert_eq!(token.len(), 13);
        assert!(token
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    }

    #[test]
    fn tokens_differ_between_draws() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        assert_ne!(generate_token(&mut rng), generate_token(&mut rng));
    }

    #[test]
    fn payload_expires_a_day_after_generation() {
        let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
        // 2025-08-12 00:00:00 UTC
        let payload = SharePayload::new(
            &PatientProfile::demo(),
            ShareSettings::default(),
            1_754_956_800_000,
            &mut rng,
        );
        assert!(payload.expires.starts_with("2025-08-13T00:00:00"));
        assert_eq!(payload.patient, "Jazmine VB");
    }

    #[test]
    fn payload_serializes_permissions_in_camel_case() {
        let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
        let payload = SharePayload::new(
            &PatientProfile::demo(),
            ShareSettings::default(),
            0,
            &mut rng,
        );
        let json = payload.to_json().expect("encode payload");
        assert!(json.contains("\"clinicalSummary\":true"));
        assert!(json.contains("\"imaging\":false"));
        assert!(json.contains("\"token\""));
    }

    #[test]
    fn share_link_embeds_the_token() {
        assert_eq!(
            share_link("abc123"),
            "https://myhealth.app/share/abc123"
        );
    }
}

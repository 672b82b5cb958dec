// utils/token.rs
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

pub const VERIFICATION_TOKEN_BYTES: usize = 32;
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// 32 random bytes, hex encoded.
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn verification_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS)
}

pub fn verification_link(app_url: &str, token: &str) -> String {
    format!("{}/auth/verify-email?token={}", app_url.trim_end_matches('/'), token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_and_unique() {
        let a = generate_verification_token();
        let b = generate_verification_token();
        assert_eq!(a.len(), VERIFICATION_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn link_joins_without_double_slash() {
        assert_eq!(
            verification_link("https://iayos.online/", "abc"),
            "https://iayos.online/auth/verify-email?token=abc"
        );
    }
}

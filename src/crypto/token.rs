use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;

/// The size of a session token in bytes.
const SESSION_TOKEN_SIZE: usize = 32;

/// Length of an encoded session token (unpadded base64 of 32 bytes).
const ENCODED_TOKEN_LEN: usize = 43;

/// Generates a new random session token.
///
/// # Returns
///
/// A URL-safe base64-encoded token carrying 256 bits from the OS RNG.
pub fn generate_session_token() -> String {
    let mut token = [0u8; SESSION_TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

/// Whether `token` has the shape of a token produced by [`generate_session_token`].
///
/// Anything else is rejected before touching the session store.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == ENCODED_TOKEN_LEN
        && general_purpose::URL_SAFE_NO_PAD
            .decode(token)
            .is_ok_and(|bytes| bytes.len() == SESSION_TOKEN_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_well_formed_and_distinct() {
        let a = generate_session_token();
        let b = generate_session_token();

        assert!(is_well_formed(&a));
        assert!(is_well_formed(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("not-a-token"));
        assert!(!is_well_formed(&"*".repeat(ENCODED_TOKEN_LEN)));
        assert!(!is_well_formed(&format!("{}A", generate_session_token())));
    }
}

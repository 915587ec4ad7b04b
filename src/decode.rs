//! Bounded-depth decoding of base64-wrapped subscription payloads.
//!
//! Sources commonly serve their config list wrapped in one or more layers of
//! base64 (subscription format). Decoding is attempted a fixed number of
//! times; the first failed attempt falls back to the last good text.

use base64::engine::general_purpose;
use base64::Engine;

/// Maximum number of base64 layers peeled off a payload.
const MAX_DECODE_DEPTH: usize = 3;

/// Peel up to [`MAX_DECODE_DEPTH`] base64 layers off `text`.
///
/// Each successful decode that yields non-empty UTF-8 replaces the working
/// text. The first failure stops the loop and whatever was recovered so far
/// is returned — plaintext input comes back untouched.
pub fn decode_layers(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_DECODE_DEPTH {
        match base64_to_utf8(&current) {
            Some(decoded) => {
                if !decoded.trim().is_empty() {
                    current = decoded;
                }
            }
            None => break,
        }
    }
    current
}

/// One base64-decode-to-UTF-8 attempt.
///
/// Subscription payloads show up unpadded and URL-safe often enough that a
/// re-padded candidate and both engines are tried before giving up.
pub(crate) fn base64_to_utf8(text: &str) -> Option<String> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let mut candidates = Vec::with_capacity(2);
    candidates.push(cleaned.clone());
    let rem = cleaned.len() % 4;
    if rem != 0 {
        candidates.push(format!("{cleaned}{}", "=".repeat(4 - rem)));
    }

    for cand in &candidates {
        for engine in [&general_purpose::STANDARD, &general_purpose::URL_SAFE] {
            if let Ok(bytes) = engine.decode(cand) {
                if let Ok(decoded) = String::from_utf8(bytes) {
                    return Some(decoded);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> String {
        general_purpose::STANDARD.encode(text)
    }

    const PLAINTEXT: &str = "vless://u@example.com:443?security=tls#x\ntrojan://p@h.net:8443#y";

    #[test]
    fn plaintext_passes_through_unchanged() {
        assert_eq!(decode_layers(PLAINTEXT), PLAINTEXT);
    }

    #[test]
    fn two_layers_are_fully_recovered() {
        let wrapped = encode(&encode(PLAINTEXT));
        assert_eq!(decode_layers(&wrapped), PLAINTEXT);
    }

    #[test]
    fn deep_nesting_stops_at_the_bound() {
        let four = encode(&encode(&encode(&encode(PLAINTEXT))));
        // Three layers come off; the innermost one is still encoded.
        assert_eq!(decode_layers(&four), encode(PLAINTEXT));
    }

    #[test]
    fn unpadded_payload_is_accepted() {
        let padded = encode(PLAINTEXT);
        let unpadded = padded.trim_end_matches('=').to_string();
        assert_eq!(decode_layers(&unpadded), PLAINTEXT);
    }

    #[test]
    fn binary_garbage_falls_back_to_input() {
        // Valid base64 alphabet, but the decoded bytes are not UTF-8.
        let garbage = general_purpose::STANDARD.encode([0xff, 0xfe, 0x00, 0x80]);
        assert_eq!(decode_layers(&garbage), garbage);
    }
}

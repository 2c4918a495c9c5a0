//! Callback-envelope handling for upstream feed payloads.
//!
//! The upstream serves JSON wrapped JSONP-style: `matches({...})` for the
//! match listing and `detail({...})` for room detail. The wrapper is
//! stripped by marker, never by fixed offsets, and malformed markers fail
//! explicitly.

use thiserror::Error;

/// Malformed callback wrapper around an upstream payload.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("missing '{callback}(' prefix in payload")]
    MissingPrefix { callback: String },

    #[error("missing ')' suffix in payload for callback '{callback}'")]
    MissingSuffix { callback: String },
}

/// Strip a `<callback>(...)` envelope and return the inner text untouched.
///
/// Whitespace around the envelope is tolerated so callers can hand over
/// raw response bodies directly.
pub fn strip_envelope<'a>(raw: &'a str, callback: &str) -> Result<&'a str, EnvelopeError> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix(callback)
        .and_then(|rest| rest.strip_prefix('('))
        .ok_or_else(|| EnvelopeError::MissingPrefix {
            callback: callback.to_string(),
        })?;
    inner
        .strip_suffix(')')
        .ok_or_else(|| EnvelopeError::MissingSuffix {
            callback: callback.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_wrapped_payload() {
        let inner = strip_envelope(r#"matches({"data":{}})"#, "matches").unwrap();
        assert_eq!(inner, r#"{"data":{}}"#);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let inner = strip_envelope("\n detail({\"a\":1}) \n", "detail").unwrap();
        assert_eq!(inner, r#"{"a":1}"#);
    }

    #[test]
    fn strip_then_rewrap_is_byte_exact() {
        let original = r#"matches({"data":{"1":[{"matchTime":1000}]}})"#;
        let inner = strip_envelope(original, "matches").unwrap();
        assert_eq!(format!("matches({inner})"), original);
    }

    #[test]
    fn rejects_wrong_callback_name() {
        let err = strip_envelope(r#"detail({"a":1})"#, "matches").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingPrefix { .. }));
    }

    #[test]
    fn rejects_missing_closing_paren() {
        let err = strip_envelope(r#"matches({"a":1}"#, "matches").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingSuffix { .. }));
    }

    #[test]
    fn rejects_bare_json() {
        let err = strip_envelope(r#"{"a":1}"#, "matches").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingPrefix { .. }));
    }
}

//! Inbound address matching.
//!
//! Every message this endpoint accepts is addressed `/<name>/<method>`.
//! Anything else on the (possibly shared) socket is someone else's
//! traffic and must be rejected quietly.

use crate::error::{BridgeOscError, Result};

/// Maximum accepted method-token length in bytes.
pub const MAX_METHOD_LEN: usize = 31;

/// Validate `path` against the endpoint namespace and return the method token.
///
/// The namespace match is byte-for-byte and case-sensitive. On success the
/// returned token borrows from `path`; callers copy whatever they keep.
pub fn extract_method<'a>(path: &'a str, name: &str) -> Result<&'a str> {
    let method = path
        .strip_prefix('/')
        .and_then(|p| p.strip_prefix(name))
        .and_then(|p| p.strip_prefix('/'));

    let method = match method {
        Some(m) => m,
        None => {
            tracing::debug!("message not for this endpoint: '{}' != '/{}/...'", path, name);
            return Err(BridgeOscError::AddressMismatch);
        }
    };

    if method.is_empty() {
        tracing::debug!("message with empty method: '{}'", path);
        return Err(BridgeOscError::AddressMismatch);
    }
    if method.len() > MAX_METHOD_LEN {
        return Err(BridgeOscError::MethodTooLong { len: method.len() });
    }

    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_method() {
        assert_eq!(extract_method("/carla/control", "carla").unwrap(), "control");
        assert_eq!(extract_method("/carla/quit", "carla").unwrap(), "quit");
    }

    #[test]
    fn test_foreign_namespace_rejected() {
        for path in ["/other/control", "/carlax/control", "control", "/carla", "/"] {
            assert!(matches!(
                extract_method(path, "carla"),
                Err(BridgeOscError::AddressMismatch)
            ));
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert!(matches!(
            extract_method("/Carla/control", "carla"),
            Err(BridgeOscError::AddressMismatch)
        ));
    }

    #[test]
    fn test_empty_method_rejected() {
        assert!(matches!(
            extract_method("/carla/", "carla"),
            Err(BridgeOscError::AddressMismatch)
        ));
    }

    #[test]
    fn test_method_length_bound() {
        let at_limit = format!("/carla/{}", "m".repeat(MAX_METHOD_LEN));
        assert_eq!(extract_method(&at_limit, "carla").unwrap().len(), MAX_METHOD_LEN);

        let over = format!("/carla/{}", "m".repeat(MAX_METHOD_LEN + 1));
        assert!(matches!(
            extract_method(&over, "carla"),
            Err(BridgeOscError::MethodTooLong { len }) if len == MAX_METHOD_LEN + 1
        ));
    }

    #[test]
    fn test_path_shorter_than_name() {
        assert!(matches!(
            extract_method("/c", "carla-bridge"),
            Err(BridgeOscError::AddressMismatch)
        ));
    }
}

//! Error types for share-link parsing.

use thiserror::Error;

use crate::parser::scheme::Protocol;

/// Result alias used throughout the parser.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Everything that can go wrong while turning a share link into a [`ProxyConfig`].
///
/// Parsing is all-or-nothing: any of these aborts the call and no partial
/// record is produced.
///
/// [`ProxyConfig`]: crate::config::ProxyConfig
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The scheme token is not one of the recognized schemes or aliases.
    #[error("unknown uri type: {0}")]
    UnknownScheme(String),

    /// A builder was handed a URI for a different scheme.
    #[error("invalid {protocol} uri: expected one of {expected}, got '{found}'")]
    SchemeMismatch {
        protocol: Protocol,
        expected: String,
        found: String,
    },

    /// The URI does not have the shape the protocol requires.
    #[error("invalid {protocol} uri: {reason}")]
    InvalidUri { protocol: Protocol, reason: String },

    /// No port was given and the protocol has no default.
    #[error("invalid {protocol} uri: missing port")]
    MissingPort { protocol: Protocol },

    /// The port token is not an integer in `1..=65535`.
    #[error("invalid {protocol} uri: invalid port '{value}'")]
    InvalidPort { protocol: Protocol, value: String },

    /// A closed-set option carried a value outside that set.
    #[error("unsupported {option} for {protocol}: {value}")]
    UnsupportedOption {
        protocol: Protocol,
        option: &'static str,
        value: String,
    },

    /// A field decoded but its content is unusable.
    #[error("invalid {field} in {protocol} uri: {reason}")]
    InvalidField {
        protocol: Protocol,
        field: &'static str,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn invalid_uri(protocol: Protocol, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            protocol,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_field(
        protocol: Protocol,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            protocol,
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scheme_message() {
        let err = ParseError::UnknownScheme("foo".to_string());
        assert_eq!(err.to_string(), "unknown uri type: foo");
    }

    #[test]
    fn test_invalid_port_message() {
        let err = ParseError::InvalidPort {
            protocol: Protocol::Vless,
            value: "65536".to_string(),
        };
        assert_eq!(err.to_string(), "invalid vless uri: invalid port '65536'");
    }

    #[test]
    fn test_unsupported_option_message() {
        let err = ParseError::UnsupportedOption {
            protocol: Protocol::Shadowsocks,
            option: "plugin",
            value: "kcptun".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported plugin for ss: kcptun");
    }
}

//! Scheme normalization
//!
//! Maps the `scheme://` token of a share link onto the closed set of
//! supported protocols, including the short aliases link producers use.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParseError, Result};

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)([a-z][a-z0-9+.\-]*)://").expect("valid scheme regex"));

// ============================================================================
// Protocol
// ============================================================================

/// Every protocol a share link can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[serde(rename = "ss")]
    Shadowsocks,
    #[serde(rename = "ssr")]
    ShadowsocksR,
    Vmess,
    Vless,
    Trojan,
    Hysteria,
    Hysteria2,
    Tuic,
    Wireguard,
    Http,
    Socks5,
}

impl Protocol {
    /// Resolves a lower-case scheme token, aliases included.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        let protocol = match scheme {
            "ss" => Protocol::Shadowsocks,
            "ssr" => Protocol::ShadowsocksR,
            "vmess" => Protocol::Vmess,
            "vless" => Protocol::Vless,
            "trojan" => Protocol::Trojan,
            "hysteria" | "hy" => Protocol::Hysteria,
            "hysteria2" | "hy2" => Protocol::Hysteria2,
            "tuic" => Protocol::Tuic,
            "wireguard" | "wg" => Protocol::Wireguard,
            "http" | "https" => Protocol::Http,
            "socks5" | "socks" => Protocol::Socks5,
            _ => return None,
        };
        Some(protocol)
    }

    /// Scheme tokens accepted for this protocol, canonical one first.
    pub fn schemes(self) -> &'static [&'static str] {
        match self {
            Protocol::Shadowsocks => &["ss"],
            Protocol::ShadowsocksR => &["ssr"],
            Protocol::Vmess => &["vmess"],
            Protocol::Vless => &["vless"],
            Protocol::Trojan => &["trojan"],
            Protocol::Hysteria => &["hysteria", "hy"],
            Protocol::Hysteria2 => &["hysteria2", "hy2"],
            Protocol::Tuic => &["tuic"],
            Protocol::Wireguard => &["wireguard", "wg"],
            Protocol::Http => &["http", "https"],
            Protocol::Socks5 => &["socks5", "socks"],
        }
    }

    /// The `type` tag the record carries.
    pub fn as_str(self) -> &'static str {
        self.schemes()[0]
    }

    /// Human label used when a link carries no name.
    pub fn label(self) -> &'static str {
        match self {
            Protocol::Shadowsocks => "Shadowsocks",
            Protocol::ShadowsocksR => "ShadowsocksR",
            Protocol::Vmess => "VMess",
            Protocol::Vless => "VLESS",
            Protocol::Trojan => "Trojan",
            Protocol::Hysteria => "Hysteria",
            Protocol::Hysteria2 => "Hysteria2",
            Protocol::Tuic => "TUIC",
            Protocol::Wireguard => "WireGuard",
            Protocol::Http => "HTTP",
            Protocol::Socks5 => "SOCKS5",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// A share link with its scheme lower-cased and resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUri {
    pub protocol: Protocol,
    /// The scheme token as written (lower-cased), e.g. `hy2` or `https`.
    pub scheme: String,
    /// `<scheme>://<rest>` with the normalized scheme.
    pub uri: String,
}

/// Trims the link, lower-cases its scheme and resolves it to a [`Protocol`].
pub fn normalize(uri: &str) -> Result<NormalizedUri> {
    let trimmed = uri.trim();

    let (scheme, rest) = match SCHEME_PREFIX.captures(trimmed) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            let scheme = caps.get(1).map_or("", |m| m.as_str());
            (scheme.to_ascii_lowercase(), &trimmed[whole..])
        }
        // Best effort for tokens the strict pattern rejects, e.g. `_ss://`
        None => match trimmed.split_once("://") {
            Some((head, rest)) => (head.trim().to_ascii_lowercase(), rest),
            None => (trimmed.to_ascii_lowercase(), ""),
        },
    };

    let protocol =
        Protocol::from_scheme(&scheme).ok_or_else(|| ParseError::UnknownScheme(scheme.clone()))?;
    debug!("Normalized scheme '{}' -> {}", scheme, protocol.label());

    Ok(NormalizedUri {
        protocol,
        uri: format!("{scheme}://{rest}"),
        scheme,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scheme_aliases() {
        assert_eq!(Protocol::from_scheme("hy2"), Some(Protocol::Hysteria2));
        assert_eq!(Protocol::from_scheme("hy"), Some(Protocol::Hysteria));
        assert_eq!(Protocol::from_scheme("wg"), Some(Protocol::Wireguard));
        assert_eq!(Protocol::from_scheme("socks"), Some(Protocol::Socks5));
        assert_eq!(Protocol::from_scheme("https"), Some(Protocol::Http));
        assert_eq!(Protocol::from_scheme("foo"), None);
    }

    #[test]
    fn test_every_scheme_resolves_back() {
        let protocols = [
            Protocol::Shadowsocks,
            Protocol::ShadowsocksR,
            Protocol::Vmess,
            Protocol::Vless,
            Protocol::Trojan,
            Protocol::Hysteria,
            Protocol::Hysteria2,
            Protocol::Tuic,
            Protocol::Wireguard,
            Protocol::Http,
            Protocol::Socks5,
        ];
        for protocol in protocols {
            for scheme in protocol.schemes() {
                assert_eq!(Protocol::from_scheme(scheme), Some(protocol));
            }
        }
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        let normalized = normalize("  VLESS://uuid@host:443  ").unwrap();
        assert_eq!(normalized.protocol, Protocol::Vless);
        assert_eq!(normalized.scheme, "vless");
        assert_eq!(normalized.uri, "vless://uuid@host:443");
    }

    #[test]
    fn test_normalize_keeps_alias() {
        let normalized = normalize("Hy2://pw@host").unwrap();
        assert_eq!(normalized.protocol, Protocol::Hysteria2);
        assert_eq!(normalized.uri, "hy2://pw@host");
    }

    #[test]
    fn test_normalize_unknown() {
        assert_eq!(
            normalize("foo://bar"),
            Err(ParseError::UnknownScheme("foo".to_string()))
        );
        assert!(matches!(normalize("no scheme"), Err(ParseError::UnknownScheme(_))));
        assert!(matches!(normalize(""), Err(ParseError::UnknownScheme(_))));
    }

    #[test]
    fn test_normalize_guesses_irregular_scheme() {
        assert_eq!(
            normalize("_x://bar"),
            Err(ParseError::UnknownScheme("_x".to_string()))
        );
    }

    #[test]
    fn test_label_and_tag() {
        assert_eq!(Protocol::Shadowsocks.as_str(), "ss");
        assert_eq!(Protocol::Socks5.to_string(), "socks5");
        assert_eq!(Protocol::Hysteria2.label(), "Hysteria2");
    }
}

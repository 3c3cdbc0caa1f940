//! Protocol parsers module
//!
//! This module contains parsers for the supported share-link formats.
//! Each parser implements the `ProtocolParser` trait to provide a consistent
//! interface for turning a link into a mihomo proxy configuration.

mod http;
mod hysteria;
mod hysteria2;
mod shadowsocks;
mod shadowsocksr;
mod socks5;
mod trojan;
mod tuic;
mod vless;
mod vmess;
mod wireguard;

pub use http::HttpParser;
pub use hysteria::HysteriaParser;
pub use hysteria2::Hysteria2Parser;
pub use shadowsocks::ShadowsocksParser;
pub use shadowsocksr::ShadowsocksRParser;
pub use socks5::Socks5Parser;
pub use trojan::TrojanParser;
pub use tuic::TuicParser;
pub use vless::VlessParser;
pub use vmess::VmessParser;
pub use wireguard::WireguardParser;

use tracing::{trace, warn};

use crate::config::ProxyConfig;
use crate::error::{ParseError, Result};
use crate::parser::scheme::Protocol;
use crate::parser::uri::{is_truthy, non_blank, percent_decode, split_list};

// ============================================================================
// Protocol Parser Trait
// ============================================================================

/// Trait for parsing individual protocol URIs
pub trait ProtocolParser: Send + Sync {
    /// The protocol this parser produces
    fn protocol(&self) -> Protocol;

    /// Parses a full `scheme://...` link into a proxy configuration
    fn parse(&self, uri: &str) -> Result<ProxyConfig>;

    /// Splits `scheme://rest`, rejecting schemes that belong to another protocol.
    ///
    /// Returns the scheme as written and the remainder.
    fn strip_scheme<'a>(&self, uri: &'a str) -> Result<(&'a str, &'a str)> {
        let protocol = self.protocol();
        let uri = uri.trim();
        let (scheme, rest) = uri.split_once("://").unwrap_or(("", uri));
        if protocol
            .schemes()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
        {
            Ok((scheme, rest))
        } else {
            Err(ParseError::SchemeMismatch {
                protocol,
                expected: protocol.schemes().join("|"),
                found: scheme.to_string(),
            })
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Normalizes a Shadowsocks/SSR/VMess cipher name.
///
/// Known names pass through, a few aliases are rewritten to their canonical
/// form, unknown names become `auto` and a missing or blank name is `none`.
pub fn normalize_cipher(cipher: Option<&str>) -> String {
    let Some(cipher) = cipher.map(str::trim).filter(|c| !c.is_empty()) else {
        return "none".to_string();
    };
    let lower = cipher.to_ascii_lowercase();
    let canonical = match lower.as_str() {
        "chacha20-poly1305" => "chacha20-ietf-poly1305",
        "xchacha20-poly1305" => "xchacha20-ietf-poly1305",
        "aead_aes_128_gcm" => "aes-128-gcm",
        "aead_aes_256_gcm" => "aes-256-gcm",
        "aead_chacha20_poly1305" => "chacha20-ietf-poly1305",
        known @ ("none" | "auto" | "zero" | "dummy" | "plain" | "table" | "rc4" | "rc4-md5"
        | "rc4-md5-6" | "aes-128-gcm" | "aes-192-gcm" | "aes-256-gcm" | "aes-128-ccm"
        | "aes-192-ccm" | "aes-256-ccm" | "aes-128-gcm-siv" | "aes-256-gcm-siv"
        | "aes-128-cfb" | "aes-192-cfb" | "aes-256-cfb" | "aes-128-cfb8" | "aes-192-cfb8"
        | "aes-256-cfb8" | "aes-128-ctr" | "aes-192-ctr" | "aes-256-ctr" | "aes-128-ofb"
        | "aes-192-ofb" | "aes-256-ofb" | "camellia-128-cfb" | "camellia-192-cfb"
        | "camellia-256-cfb" | "bf-cfb" | "cast5-cfb" | "des-cfb" | "idea-cfb" | "rc2-cfb"
        | "seed-cfb" | "salsa20" | "chacha20" | "chacha20-ietf" | "xchacha20"
        | "chacha20-ietf-poly1305" | "xchacha20-ietf-poly1305" | "chacha8-ietf-poly1305"
        | "xchacha8-ietf-poly1305" | "rabbit128-poly1305" | "aegis-128l" | "aegis-256"
        | "aez-384" | "deoxys-ii-256-128" | "lea-128-gcm" | "lea-192-gcm" | "lea-256-gcm"
        | "sm4-gcm" | "sm4-ccm" | "2022-blake3-aes-128-gcm" | "2022-blake3-aes-256-gcm"
        | "2022-blake3-chacha20-poly1305" | "2022-blake3-chacha12-poly1305"
        | "2022-blake3-chacha8-poly1305") => known,
        _ => {
            warn!(cipher, "Unknown cipher, falling back to 'auto'");
            "auto"
        }
    };
    canonical.to_string()
}

/// Keeps a uTLS client fingerprint only when mihomo knows it.
pub fn validate_client_fingerprint(fingerprint: &str) -> Option<String> {
    let fingerprint = fingerprint.trim();
    match fingerprint {
        "" => None,
        "chrome" | "firefox" | "safari" | "ios" | "android" | "edge" | "360" | "qq"
        | "random" | "randomized" => Some(fingerprint.to_string()),
        other => {
            warn!(fingerprint = other, "Unsupported client fingerprint dropped");
            None
        }
    }
}

/// Splits an `alpn` list; an empty list is absent.
pub fn parse_alpn(value: &str) -> Option<Vec<String>> {
    let alpn = split_list(value);
    if alpn.is_empty() { None } else { Some(alpn) }
}

/// Reads a `Host` value that may be given raw or as a JSON header object
/// such as `{"Host":"a.com"}`.
pub fn host_header(value: &str) -> String {
    serde_json::from_str::<serde_json::Value>(value)
        .ok()
        .and_then(|parsed| parsed.get("Host")?.as_str().map(str::to_string))
        .unwrap_or_else(|| value.to_string())
}

/// Accepts `xtls-rprx-vision` flows; anything else is dropped.
pub fn validate_flow(flow: &str) -> Option<String> {
    match flow.trim() {
        "" => None,
        known @ ("xtls-rprx-vision" | "xtls-rprx-vision-udp443") => Some(known.to_string()),
        other => {
            warn!(flow = other, "Unsupported flow dropped");
            None
        }
    }
}

/// Splits raw `user:pass` userinfo on the first `:`, then percent-decodes
/// each half. Blank halves are absent.
pub fn split_credentials(auth: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(auth) = auth else {
        return (None, None);
    };
    let (user, pass) = match auth.split_once(':') {
        Some((user, pass)) => (user, Some(pass)),
        None => (auth, None),
    };
    let decode = |value: &str| non_blank(&percent_decode(value));
    (decode(user), pass.and_then(decode))
}

/// `"1"`, `"true"`, `"tls"` and their case variants mean TLS is on.
pub fn is_tls_flag(value: &str) -> bool {
    let value = value.trim();
    is_truthy(value) || value.eq_ignore_ascii_case("tls")
}

/// Parses a numeric option, ignoring values that are not unsigned integers.
pub fn parse_number(protocol: Protocol, key: &str, value: &str) -> Option<u64> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        trace!("Ignoring non-numeric {} parameter {}='{}'", protocol, key, value);
    }
    parsed
}

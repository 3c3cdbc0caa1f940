//! Share-link parsing
//!
//! This module turns a single proxy share link (`ss://`, `vmess://`,
//! `vless://`, `trojan://`, `hysteria2://`, ...) into a [`ProxyConfig`]:
//! - `scheme` normalizes the scheme token and resolves aliases
//! - `base64` and `uri` hold the primitive decoders every protocol shares
//! - `protocols` holds one builder per protocol
//!
//! Parsing is pure: no I/O, no state kept between calls.

pub mod base64;
pub mod protocols;
pub mod scheme;
pub mod uri;

use tracing::debug;

use crate::config::ProxyConfig;
use crate::error::Result;

use self::protocols::{
    HttpParser, Hysteria2Parser, HysteriaParser, ProtocolParser, ShadowsocksParser,
    ShadowsocksRParser, Socks5Parser, TrojanParser, TuicParser, VlessParser, VmessParser,
    WireguardParser,
};
use self::scheme::Protocol;

/// Parses one share link into a proxy configuration.
///
/// Leading and trailing whitespace is ignored and the scheme is matched
/// case-insensitively. Fails with [`ParseError::UnknownScheme`] for schemes
/// outside the supported set, or with a protocol-specific error when the link
/// is malformed.
///
/// [`ParseError::UnknownScheme`]: crate::error::ParseError::UnknownScheme
pub fn parse_uri(uri: &str) -> Result<ProxyConfig> {
    let normalized = scheme::normalize(uri)?;
    let protocol = normalized.protocol;

    let parser: &dyn ProtocolParser = match protocol {
        Protocol::Shadowsocks => &ShadowsocksParser,
        Protocol::ShadowsocksR => &ShadowsocksRParser,
        Protocol::Vmess => &VmessParser,
        Protocol::Vless => &VlessParser,
        Protocol::Trojan => &TrojanParser,
        Protocol::Hysteria => &HysteriaParser,
        Protocol::Hysteria2 => &Hysteria2Parser,
        Protocol::Tuic => &TuicParser,
        Protocol::Wireguard => &WireguardParser,
        Protocol::Http => &HttpParser,
        Protocol::Socks5 => &Socks5Parser,
    };

    let result = parser.parse(&normalized.uri);
    match &result {
        Ok(proxy) => debug!(
            "Successfully parsed {} URI -> proxy '{}'",
            normalized.scheme,
            proxy.name()
        ),
        Err(e) => debug!("Failed to parse {} URI: {}", normalized.scheme, e),
    }
    result
}

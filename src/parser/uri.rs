//! Tokenizing of the `auth@host:port?query#fragment` shape shared by most
//! share links, plus the query and fragment decoders.

use std::borrow::Cow;
use std::net::Ipv6Addr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::scheme::Protocol;

/// Anchored pattern for the body left after fragment and query are split off.
///
/// `auth` is greedy so passwords containing `@` keep everything up to the last
/// one. The host is either a bracketed IPv6 literal or the shortest run that
/// still leaves a `:port` suffix.
static BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<auth>.*)@)?(?:\[(?P<ipv6>[^\]]*)\]|(?P<host>[^\[\]@/]*?))(?::(?P<port>[^:\[\]@/]*))?/*$")
        .expect("valid uri body regex")
});

// ============================================================================
// Percent Decoding
// ============================================================================

/// Percent-decodes `value`, falling back to the raw text when the escapes do
/// not form valid UTF-8.
pub fn percent_decode(value: &str) -> Cow<'_, str> {
    urlencoding::decode(value).unwrap_or(Cow::Borrowed(value))
}

/// Decodes a link fragment into a display name; blank means absent.
pub fn decode_fragment(fragment: Option<&str>) -> Option<String> {
    let decoded = percent_decode(fragment?);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits off the fragment at the last `#`.
pub fn split_fragment(input: &str) -> (&str, Option<&str>) {
    match input.rfind('#') {
        Some(pos) => (&input[..pos], Some(&input[pos + 1..])),
        None => (input, None),
    }
}

/// Splits off the query at the first `?`.
pub fn split_query(input: &str) -> (&str, Option<&str>) {
    match input.find('?') {
        Some(pos) => (&input[..pos], Some(&input[pos + 1..])),
        None => (input, None),
    }
}

// ============================================================================
// URI Parts
// ============================================================================

/// The pieces of a tokenized share link, still undecoded except for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParts<'a> {
    pub auth: Option<&'a str>,
    pub host: &'a str,
    pub port: Option<&'a str>,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> UriParts<'a> {
    /// Tokenizes the remainder of a link (everything after `scheme://`).
    pub fn tokenize(rest: &'a str, protocol: Protocol, require_auth: bool) -> Result<Self> {
        let (without_fragment, fragment) = split_fragment(rest);
        let (body, query) = split_query(without_fragment);

        let (auth, host, port) = split_body(body)
            .ok_or_else(|| ParseError::invalid_uri(protocol, format!("malformed '{body}'")))?;

        if host.is_empty() {
            return Err(ParseError::invalid_uri(protocol, "missing server"));
        }
        if require_auth && auth.is_none() {
            return Err(ParseError::invalid_uri(protocol, "missing '@' credentials"));
        }

        trace!(
            "Tokenized {} uri: host={}, port={:?}, query={}, fragment={}",
            protocol,
            host,
            port,
            query.is_some(),
            fragment.is_some()
        );

        Ok(Self {
            auth,
            host,
            port,
            query,
            fragment,
        })
    }

    /// Resolves the port, using `default` when the link carries none.
    pub fn port_or(&self, protocol: Protocol, default: Option<u16>) -> Result<u16> {
        match self.port {
            Some(token) if !token.is_empty() => parse_port(protocol, token),
            _ => default.ok_or(ParseError::MissingPort { protocol }),
        }
    }

    pub fn auth_decoded(&self) -> Option<String> {
        self.auth.map(|auth| percent_decode(auth).into_owned())
    }

    pub fn name(&self) -> Option<String> {
        decode_fragment(self.fragment)
    }

    pub fn params(&self) -> QueryParams {
        QueryParams::parse(self.query.unwrap_or_default())
    }
}

/// Splits `auth@host:port` (any part but the host optional).
fn split_body(body: &str) -> Option<(Option<&str>, &str, Option<&str>)> {
    // Unbracketed IPv6 literal without a port, e.g. `fd00::2`
    let (auth, host_part) = match body.rfind('@') {
        Some(pos) => (Some(&body[..pos]), &body[pos + 1..]),
        None => (None, body),
    };
    let bare = host_part.trim_end_matches('/');
    if bare.parse::<Ipv6Addr>().is_ok() {
        return Some((auth, bare, None));
    }

    let caps = BODY.captures(body)?;
    let host = match (caps.name("ipv6"), caps.name("host")) {
        (Some(ipv6), _) => ipv6.as_str(),
        // A colon outside brackets is only valid in a bare IPv6 literal
        (None, Some(host)) if host.as_str().contains(':') => return None,
        (None, host) => host.map_or("", |m| m.as_str()),
    };
    Some((
        caps.name("auth").map(|m| m.as_str()),
        host,
        caps.name("port").map(|m| m.as_str()),
    ))
}

/// Parses a port token, accepting only integers in `1..=65535`.
pub fn parse_port(protocol: Protocol, token: &str) -> Result<u16> {
    let token = token.trim();
    let invalid = || ParseError::InvalidPort {
        protocol,
        value: token.to_string(),
    };
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match token.parse::<u32>() {
        Ok(port @ 1..=65535) => Ok(port as u16),
        _ => Err(invalid()),
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Ordered, decoded query parameters with canonical (`kebab-case`) keys.
///
/// Repeated keys are kept in order; [`QueryParams::get`] returns the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses `a=1&b_c=2`: splits on `&`, then on the first `=`, percent-decodes
    /// the value and rewrites `_` to `-` in the key.
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (
                    canonical_key(&percent_decode(key)),
                    percent_decode(value).into_owned(),
                )
            })
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'s>(&'s self, key: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn canonical_key(key: &str) -> String {
    key.replace('_', "-")
}

// ============================================================================
// Value Helpers
// ============================================================================

/// Case-insensitive `true`/`1` check used for boolean query flags.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Splits a comma list, trimming items and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns `Some(value)` only when it is not blank.
pub fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

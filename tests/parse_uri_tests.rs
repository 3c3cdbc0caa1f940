//! End-to-end tests for `parse_uri`.
//!
//! These run whole share links through the public entry point and check the
//! resulting records and their mihomo serialization.

use proxylink::config::{ProxyConfig, ProxyList};
use proxylink::parser::base64::decode_base64_or_literal;
use proxylink::parser::scheme::Protocol;
use proxylink::{ParseError, parse_uri};
use serde_json::json;

fn to_json(proxy: &ProxyConfig) -> serde_json::Value {
    serde_json::to_value(proxy).unwrap()
}

// ============================================================================
// Example Scenarios
// ============================================================================

#[test]
fn test_shadowsocks_sip002_scenario() {
    let proxy = parse_uri("ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com:8388#MyNode").unwrap();
    assert_eq!(
        to_json(&proxy),
        json!({
            "type": "ss",
            "name": "MyNode",
            "server": "example.com",
            "port": 8388,
            "cipher": "aes-256-gcm",
            "password": "password"
        })
    );
}

#[test]
fn test_trojan_scenario() {
    let proxy = parse_uri("trojan://secret@host.example:443?sni=sni.example.com#Trojan1").unwrap();
    assert_eq!(
        to_json(&proxy),
        json!({
            "type": "trojan",
            "name": "Trojan1",
            "server": "host.example",
            "port": 443,
            "password": "secret",
            "sni": "sni.example.com"
        })
    );
}

#[test]
fn test_vless_reality_scenario() {
    let proxy = parse_uri(
        "vless://11111111-2222-3333-4444-555555555555@vless.example:443?encryption=none&security=reality&pbk=PUBKEY&sid=AB12#VL",
    )
    .unwrap();
    let value = to_json(&proxy);
    assert_eq!(value["type"], "vless");
    assert_eq!(value["name"], "VL");
    assert_eq!(value["tls"], true);
    assert_eq!(value["uuid"], "11111111-2222-3333-4444-555555555555");
    assert_eq!(
        value["reality-opts"],
        json!({"public-key": "PUBKEY", "short-id": "AB12"})
    );
    assert!(value.get("network").is_none());
}

#[test]
fn test_unknown_scheme_scenario() {
    let err = parse_uri("foo://bar").unwrap_err();
    assert_eq!(err, ParseError::UnknownScheme("foo".to_string()));
    assert_eq!(err.to_string(), "unknown uri type: foo");
}

#[test]
fn test_hysteria2_empty_fragment_scenario() {
    let proxy = parse_uri("hysteria2://pw@h2.example#").unwrap();
    assert_eq!(proxy.name(), "Hysteria2 h2.example:443");
    assert_eq!(proxy.port(), 443);
}

#[test]
fn test_wireguard_scenario() {
    let proxy = parse_uri(
        "wg://PRIVKEY@wg.example:51820?address=10.0.0.2/32,fd00::2/128&public-key=PUBKEY",
    )
    .unwrap();
    let value = to_json(&proxy);
    assert_eq!(value["type"], "wireguard");
    assert_eq!(value["ip"], "10.0.0.2");
    assert_eq!(value["ipv6"], "fd00::2");
    assert_eq!(value["private-key"], "PRIVKEY");
    assert_eq!(value["public-key"], "PUBKEY");
    assert_eq!(value["udp"], true);
}

// ============================================================================
// Scheme Closure
// ============================================================================

#[test]
fn test_unrecognized_schemes_fail() {
    for uri in [
        "foo://bar",
        "FOO://bar",
        "vmess1://abc",
        "shadowsocks://abc",
        "h2://abc",
        "socks4://127.0.0.1:1080",
        "ftp://example.com",
    ] {
        assert!(
            matches!(parse_uri(uri), Err(ParseError::UnknownScheme(_))),
            "{uri} should be rejected"
        );
    }
}

#[test]
fn test_missing_scheme_fails() {
    assert!(parse_uri("example.com:443").is_err());
    assert!(parse_uri("").is_err());
    assert!(parse_uri("   ").is_err());
}

#[test]
fn test_scheme_aliases_and_case() {
    let cases = [
        ("HY2://pw@example.com", Protocol::Hysteria2),
        ("Hysteria2://pw@example.com", Protocol::Hysteria2),
        ("hy://example.com?auth=a", Protocol::Hysteria),
        ("WG://key@example.com", Protocol::Wireguard),
        ("Socks://127.0.0.1:1080", Protocol::Socks5),
        ("HTTPS://proxy.example:443", Protocol::Http),
    ];
    for (uri, protocol) in cases {
        assert_eq!(parse_uri(uri).unwrap().protocol(), protocol, "{uri}");
    }
}

// ============================================================================
// Port Handling
// ============================================================================

#[test]
fn test_port_boundaries() {
    let templates = [
        "trojan://pw@example.com:{}",
        "vless://uuid@example.com:{}",
        "http://proxy.example:{}",
        "socks5://proxy.example:{}",
        "tuic://uuid:pw@example.com:{}",
        "hysteria2://pw@example.com:{}",
    ];
    for template in templates {
        for port in ["0", "65536", "abc", "-1"] {
            let uri = template.replace("{}", port);
            assert!(
                matches!(parse_uri(&uri), Err(ParseError::InvalidPort { .. })),
                "{uri} should be rejected"
            );
        }
        for (port, expected) in [("1", 1), ("65535", 65535)] {
            let uri = template.replace("{}", port);
            assert_eq!(parse_uri(&uri).unwrap().port(), expected, "{uri}");
        }
    }
}

#[test]
fn test_colon_in_unbracketed_host_fails() {
    for uri in ["trojan://pw@h:443:1", "vless://uuid@a.example:b:443", "socks5://h:1:2"] {
        assert!(
            matches!(parse_uri(uri), Err(ParseError::InvalidUri { .. })),
            "{uri} should be rejected"
        );
    }
}

#[test]
fn test_port_required_or_defaulted() {
    for uri in [
        "vless://uuid@example.com",
        "http://proxy.example",
        "socks5://proxy.example",
        "ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com",
    ] {
        assert!(
            matches!(parse_uri(uri), Err(ParseError::MissingPort { .. })),
            "{uri} should need a port"
        );
    }
    for uri in [
        "trojan://pw@example.com",
        "hysteria://example.com",
        "hysteria2://example.com",
        "tuic://uuid:pw@example.com",
        "wireguard://key@example.com",
    ] {
        assert_eq!(parse_uri(uri).unwrap().port(), 443, "{uri}");
    }
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_default_names() {
    let cases = [
        ("ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com:8388", "Shadowsocks example.com:8388"),
        ("vless://uuid@example.com:443#%20%20", "VLESS example.com:443"),
        ("trojan://pw@example.com", "Trojan example.com:443"),
        ("hy://example.com:8443", "Hysteria example.com:8443"),
        ("tuic://u:p@[2001:db8::1]:443", "TUIC 2001:db8::1:443"),
        ("wg://key@example.com:51820", "WireGuard example.com:51820"),
        ("http://proxy.example:8080", "HTTP proxy.example:8080"),
        ("socks://proxy.example:1080", "SOCKS5 proxy.example:1080"),
    ];
    for (uri, name) in cases {
        assert_eq!(parse_uri(uri).unwrap().name(), name, "{uri}");
    }
}

#[test]
fn test_fragment_names_are_decoded() {
    let proxy = parse_uri("trojan://pw@example.com:443#%F0%9F%87%AF%F0%9F%87%B5%20Tokyo%2001").unwrap();
    assert_eq!(proxy.name(), "🇯🇵 Tokyo 01");
}

// ============================================================================
// Purity and Fallbacks
// ============================================================================

#[test]
fn test_parse_is_idempotent() {
    let uris = [
        "ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com:8388/?plugin=obfs-local%3Bobfs%3Dhttp%3Bobfs-host%3Dcdn.example.com#S",
        "vless://uuid@example.com:443?type=ws&path=/ws&host=h.example&security=tls",
        "wg://key@example.com?address=10.0.0.2/32&reserved=1,2,3",
        "hy2://pw@example.com?obfs=salamander&obfs-password=x",
    ];
    for uri in uris {
        assert_eq!(parse_uri(uri).unwrap(), parse_uri(uri).unwrap(), "{uri}");
    }
}

#[test]
fn test_base64_fallback_keeps_plain_text() {
    for text in ["method:password", "hello world", "plain-text_with.symbols!"] {
        assert_eq!(decode_base64_or_literal(text), text);
    }
    assert_eq!(decode_base64_or_literal("YWVzLTI1Ni1nY206cGFzc3dvcmQ="), "aes-256-gcm:password");
}

#[test]
fn test_plain_userinfo_shadowsocks() {
    let proxy = parse_uri("ss://chacha20-poly1305:p%40ss@example.com:8388#Plain").unwrap();
    let value = to_json(&proxy);
    assert_eq!(value["cipher"], "chacha20-ietf-poly1305");
    assert_eq!(value["password"], "p@ss");
}

// ============================================================================
// Serialization Shape
// ============================================================================

#[test]
fn test_transport_serialization() {
    let proxy = parse_uri(
        "vless://uuid@example.com:443?type=ws&path=%2Fws&host=cdn.example.com&security=tls&fp=chrome",
    )
    .unwrap();
    let value = to_json(&proxy);
    assert_eq!(value["network"], "ws");
    assert_eq!(
        value["ws-opts"],
        json!({"path": "/ws", "headers": {"Host": "cdn.example.com"}})
    );
    assert_eq!(value["servername"], "cdn.example.com");
    assert_eq!(value["client-fingerprint"], "chrome");
}

#[test]
fn test_plugin_serialization() {
    let proxy = parse_uri(
        "ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com:8388/?plugin=obfs-local%3Bobfs%3Dtls%3Bobfs-host%3Dbing.com",
    )
    .unwrap();
    let value = to_json(&proxy);
    assert_eq!(value["plugin"], "obfs");
    assert_eq!(value["plugin-opts"], json!({"mode": "tls", "host": "bing.com"}));
}

#[test]
fn test_unsupported_plugin_is_an_error() {
    let err = parse_uri(
        "ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com:8388/?plugin=kcptun%3Bmode%3Dfast",
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedOption { option: "plugin", .. }));
}

#[test]
fn test_unknown_query_keys_are_ignored() {
    let proxy = parse_uri("trojan://pw@example.com:443?foo=bar&baz#T").unwrap();
    assert_eq!(proxy.name(), "T");
}

#[test]
fn test_yaml_round_trip_of_proxy_list() {
    let proxies = [
        "ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com:8388#S",
        "trojan://pw@example.com:443?type=grpc&serviceName=svc#T",
        "socks5://u:p@127.0.0.1:1080#L",
    ]
    .iter()
    .map(|uri| parse_uri(uri).unwrap())
    .collect();
    let list = ProxyList { proxies };
    let yaml = serde_yaml::to_string(&list).unwrap();
    let back: ProxyList = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, list);
}

//! Proxy share-link parsing.
//!
//! [`parse_uri`] turns a single `ss://`, `ssr://`, `vmess://`, `vless://`,
//! `trojan://`, `hysteria://`, `hysteria2://`, `tuic://`, `wireguard://`,
//! `http(s)://` or `socks5://` link into a [`ProxyConfig`] in the mihomo
//! proxy shape.

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;

pub use config::ProxyConfig;
pub use error::ParseError;
pub use parser::parse_uri;

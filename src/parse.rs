//! Endpoint extraction from config lines, dispatched by scheme.
//!
//! vmess nests a base64-encoded JSON document after the scheme; every other
//! recognized scheme follows a `scheme://[userinfo@]host:port[?query][#tag]`
//! authority shape.

use std::net::Ipv4Addr;

use serde::Deserialize;

use crate::decode;
use crate::error::ParseError;
use crate::line::{ConfigLine, Scheme};

/// A connectable host/port pair extracted from a config line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Whether the host is a bare IPv4 literal. Raw-IP entries are kept out
    /// of the liveness phase entirely; only domain-addressed endpoints get
    /// probed.
    pub fn is_ipv4_literal(&self) -> bool {
        self.host.parse::<Ipv4Addr>().is_ok()
    }
}

/// The fields of the vmess JSON document this crate cares about. The
/// document carries plenty more (`aid`, `net`, `tls`, ...) which stay
/// untouched in the raw line.
#[derive(Debug, Deserialize)]
struct VmessPayload {
    add: String,
    port: VmessPort,
}

/// vmess publishers emit `port` as either a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VmessPort {
    Number(u16),
    Text(String),
}

/// Extract the endpoint a config line points at.
pub fn parse_endpoint(line: &ConfigLine) -> Result<Endpoint, ParseError> {
    match line.scheme() {
        Scheme::Vmess => parse_vmess(line.as_str()),
        _ => parse_authority(line.as_str()),
    }
}

fn parse_vmess(raw: &str) -> Result<Endpoint, ParseError> {
    let payload = strip_scheme(raw);
    let payload = strip_fragment(payload);
    let json = decode::base64_to_utf8(payload).ok_or(ParseError::VmessPayload)?;
    let doc: VmessPayload =
        serde_json::from_str(&json).map_err(|_| ParseError::VmessPayload)?;

    let port = match doc.port {
        VmessPort::Number(port) => port,
        VmessPort::Text(text) => text
            .trim()
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidPort(text.clone()))?,
    };
    if doc.add.trim().is_empty() {
        return Err(ParseError::EmptyHost);
    }
    Ok(Endpoint {
        host: doc.add,
        port,
    })
}

fn parse_authority(raw: &str) -> Result<Endpoint, ParseError> {
    let rest = strip_scheme(raw);
    let rest = strip_fragment(rest);
    // Everything through the last '@' is credentials / identifier.
    let authority = match rest.rfind('@') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    let (host, port_part) = authority.split_once(':').ok_or(ParseError::MissingPort)?;
    let port_part = match port_part.find('?') {
        Some(pos) => &port_part[..pos],
        None => port_part,
    };
    if host.is_empty() {
        return Err(ParseError::EmptyHost);
    }
    let port = port_part
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidPort(port_part.to_string()))?;
    Ok(Endpoint {
        host: host.to_string(),
        port,
    })
}

fn strip_scheme(raw: &str) -> &str {
    match raw.split_once("://") {
        Some((_, rest)) => rest,
        None => raw,
    }
}

fn strip_fragment(text: &str) -> &str {
    match text.find('#') {
        Some(pos) => &text[..pos],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose;
    use base64::Engine;

    fn line(raw: &str) -> ConfigLine {
        ConfigLine::parse(raw).expect("recognized scheme")
    }

    #[test]
    fn vless_authority_with_query_and_fragment() {
        let endpoint = parse_endpoint(&line("vless://user@example.com:443?security=tls#x"));
        assert_eq!(
            endpoint,
            Ok(Endpoint {
                host: "example.com".to_string(),
                port: 443,
            })
        );
    }

    #[test]
    fn credentials_end_at_the_last_at_sign() {
        // ssr userinfo may itself contain '@'.
        let endpoint = parse_endpoint(&line("trojan://p@ss@word@node.example.net:8443#t"));
        assert_eq!(endpoint.map(|e| e.host), Ok("node.example.net".to_string()));
    }

    #[test]
    fn query_glued_to_port_is_stripped() {
        let endpoint = parse_endpoint(&line("hy2://host.example.org:443?insecure=1"));
        assert_eq!(
            endpoint,
            Ok(Endpoint {
                host: "host.example.org".to_string(),
                port: 443,
            })
        );
    }

    #[test]
    fn missing_port_separator_is_rejected() {
        assert_eq!(
            parse_endpoint(&line("vless://user@example.com")),
            Err(ParseError::MissingPort)
        );
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        assert_eq!(
            parse_endpoint(&line("tuic://u@example.com:none")),
            Err(ParseError::InvalidPort("none".to_string()))
        );
    }

    #[test]
    fn vmess_payload_with_string_port() {
        let doc = r#"{"add":"1.2.3.4","port":"8080","ps":"name","aid":0}"#;
        let raw = format!("vmess://{}", general_purpose::STANDARD.encode(doc));
        let endpoint = parse_endpoint(&line(&raw));
        assert_eq!(
            endpoint,
            Ok(Endpoint {
                host: "1.2.3.4".to_string(),
                port: 8080,
            })
        );
    }

    #[test]
    fn vmess_payload_with_numeric_port_and_fragment() {
        let doc = r#"{"add":"cdn.example.com","port":443,"net":"ws"}"#;
        let raw = format!("vmess://{}#tag", general_purpose::STANDARD.encode(doc));
        let endpoint = parse_endpoint(&line(&raw));
        assert_eq!(endpoint.map(|e| (e.host, e.port)).ok(), Some(("cdn.example.com".to_string(), 443)));
    }

    #[test]
    fn vmess_garbage_payload_is_rejected() {
        assert_eq!(
            parse_endpoint(&line("vmess://not!base64!at!all")),
            Err(ParseError::VmessPayload)
        );
    }

    #[test]
    fn ipv4_literal_hosts_are_flagged() {
        let raw_ip = Endpoint {
            host: "1.2.3.4".to_string(),
            port: 443,
        };
        let named = Endpoint {
            host: "example.com".to_string(),
            port: 443,
        };
        assert!(raw_ip.is_ipv4_literal());
        assert!(!named.is_ipv4_literal());
    }
}

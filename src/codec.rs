//! Node text codec
//!
//! Peers are persisted in their enode URL form:
//!
//! ```text
//! enode://<hex node id>@<ip>:<tcp port>[?discport=<udp port>]
//! ```
//!
//! The `discport` query is only written when the discovery port differs from
//! the session port.

use std::net::IpAddr;

use crate::types::{Node, NodeId};

const SCHEME: &str = "enode://";
const DISCPORT_KEY: &str = "discport";

/// Node encoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("record is not valid UTF-8")]
    NotUtf8,

    #[error("missing enode:// scheme")]
    MissingScheme,

    #[error("missing '@' separator between id and address")]
    MissingAddress,

    #[error("invalid node id: {0}")]
    InvalidId(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("unknown query parameter: {0}")]
    UnknownQuery(String),

    #[error("node {0} has an undialable endpoint")]
    Undialable(String),
}

/// Converts nodes to and from their persisted byte form
pub trait NodeCodec: Send + Sync {
    fn encode(&self, node: &Node) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, data: &[u8]) -> Result<Node, CodecError>;
}

/// Enode URL codec
#[derive(Debug, Clone, Copy, Default)]
pub struct EnodeCodec;

impl NodeCodec for EnodeCodec {
    fn encode(&self, node: &Node) -> Result<Vec<u8>, CodecError> {
        Ok(to_enode(node)?.into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Node, CodecError> {
        let text = std::str::from_utf8(data).map_err(|_| CodecError::NotUtf8)?;
        parse_enode(text)
    }
}

/// Render a node as an enode URL
pub fn to_enode(node: &Node) -> Result<String, CodecError> {
    if node.ip.is_unspecified() || node.tcp_port == 0 {
        return Err(CodecError::Undialable(node.id.short()));
    }

    let host = match node.ip {
        IpAddr::V4(ip) => ip.to_string(),
        IpAddr::V6(ip) => format!("[{}]", ip),
    };

    let mut url = format!("{}{}@{}:{}", SCHEME, node.id, host, node.tcp_port);
    if node.udp_port != node.tcp_port {
        url.push_str(&format!("?{}={}", DISCPORT_KEY, node.udp_port));
    }
    Ok(url)
}

/// Parse an enode URL
pub fn parse_enode(text: &str) -> Result<Node, CodecError> {
    let rest = text
        .trim()
        .strip_prefix(SCHEME)
        .ok_or(CodecError::MissingScheme)?;

    let (id_part, addr_part) = rest.split_once('@').ok_or(CodecError::MissingAddress)?;
    let id: NodeId = id_part
        .parse()
        .map_err(|e: crate::types::NodeIdError| CodecError::InvalidId(e.to_string()))?;

    let (host_port, query) = match addr_part.split_once('?') {
        Some((hp, q)) => (hp, Some(q)),
        None => (addr_part, None),
    };

    let (host, port) = split_host_port(host_port)?;
    let ip: IpAddr = host
        .parse()
        .map_err(|_| CodecError::InvalidAddress(host.to_string()))?;
    let tcp_port = parse_port(port)?;

    let mut udp_port = tcp_port;
    if let Some(query) = query {
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((DISCPORT_KEY, value)) => udp_port = parse_port(value)?,
                _ => return Err(CodecError::UnknownQuery(pair.to_string())),
            }
        }
    }

    Ok(Node::new(id, ip, udp_port, tcp_port))
}

fn split_host_port(s: &str) -> Result<(&str, &str), CodecError> {
    if let Some(bracketed) = s.strip_prefix('[') {
        let (host, tail) = bracketed
            .split_once(']')
            .ok_or_else(|| CodecError::InvalidAddress(s.to_string()))?;
        let port = tail
            .strip_prefix(':')
            .ok_or_else(|| CodecError::InvalidAddress(s.to_string()))?;
        Ok((host, port))
    } else {
        s.rsplit_once(':')
            .ok_or_else(|| CodecError::InvalidAddress(s.to_string()))
    }
}

fn parse_port(s: &str) -> Result<u16, CodecError> {
    s.parse().map_err(|_| CodecError::InvalidPort(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NODE_ID_LEN;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn test_node(udp: u16, tcp: u16) -> Node {
        Node::new(
            NodeId([0x01; NODE_ID_LEN]),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            udp,
            tcp,
        )
    }

    #[test]
    fn test_encode_same_ports_omits_discport() {
        let url = to_enode(&test_node(30303, 30303)).unwrap();
        assert_eq!(
            url,
            format!("enode://{}@10.0.0.1:30303", "01".repeat(NODE_ID_LEN))
        );
    }

    #[test]
    fn test_discport_roundtrip() {
        let node = test_node(30301, 30303);
        let bytes = EnodeCodec.encode(&node).unwrap();
        assert!(std::str::from_utf8(&bytes).unwrap().ends_with("?discport=30301"));
        assert_eq!(EnodeCodec.decode(&bytes).unwrap(), node);
    }

    #[test]
    fn test_ipv6_is_bracketed() {
        let mut node = test_node(30303, 30303);
        node.ip = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let url = to_enode(&node).unwrap();
        assert!(url.contains("@[::1]:30303"));
        assert_eq!(parse_enode(&url).unwrap(), node);
    }

    #[test]
    fn test_undialable_nodes_rejected() {
        let mut node = test_node(30303, 0);
        assert!(matches!(to_enode(&node), Err(CodecError::Undialable(_))));

        node.tcp_port = 30303;
        node.ip = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        assert!(matches!(EnodeCodec.encode(&node), Err(CodecError::Undialable(_))));
    }

    #[test]
    fn test_decode_errors() {
        let id = "01".repeat(NODE_ID_LEN);
        assert_eq!(EnodeCodec.decode(&[0xff, 0xfe]), Err(CodecError::NotUtf8));
        assert_eq!(parse_enode("garbage"), Err(CodecError::MissingScheme));
        assert_eq!(
            parse_enode(&format!("enode://{}", id)),
            Err(CodecError::MissingAddress)
        );
        assert!(matches!(
            parse_enode("enode://0102@10.0.0.1:1"),
            Err(CodecError::InvalidId(_))
        ));
        assert!(matches!(
            parse_enode(&format!("enode://{}@nohost:1", id)),
            Err(CodecError::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_enode(&format!("enode://{}@10.0.0.1:99999", id)),
            Err(CodecError::InvalidPort(_))
        ));
        assert!(matches!(
            parse_enode(&format!("enode://{}@10.0.0.1:1?foo=2", id)),
            Err(CodecError::UnknownQuery(_))
        ));
    }
}

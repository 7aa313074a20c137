use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};
use std::net::SocketAddr;

// Sentinel for missing network metadata - derivation must stay total
pub const UNKNOWN: &str = "unknown";

// Stable pseudonymous voter id: sha256 of "addr|agent", rendered as lowercase
// hex and truncated to 32 characters. Same client always maps to the same id,
// and the hash cannot be reversed back to the address/agent pair.
pub fn derive_voter_id(source_address: &str, client_agent: &str) -> String {
    let addr = if source_address.is_empty() {
        UNKNOWN
    } else {
        source_address
    };
    let agent = if client_agent.is_empty() {
        UNKNOWN
    } else {
        client_agent
    };

    let mut hasher = Sha256::new();
    hasher.update(addr.as_bytes());
    hasher.update(b"|");
    hasher.update(agent.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..32].to_string()
}

// Client address for limiter keys and voter ids. Behind a proxy the first hop
// of x-forwarded-for wins, then x-real-ip, then the direct peer address.
// Missing metadata never fails the request.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn client_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

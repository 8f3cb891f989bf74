//! Client address extractor.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

use crate::config::{HEADER_FORWARDED_FOR, HEADER_REAL_IP};

/// Address of the calling client.
///
/// Prefers the first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// socket peer. Header values that do not parse as an IP address are
/// skipped. Empty when none is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_address(parts)))
    }
}

fn client_address(parts: &Parts) -> String {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };
    let parse = |value: &str| value.trim().parse::<IpAddr>().ok();

    let forwarded = header(HEADER_FORWARDED_FOR)
        .and_then(|chain| chain.split(',').next())
        .and_then(parse);
    let real_ip = || header(HEADER_REAL_IP).and_then(parse);
    let peer = || {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    };

    forwarded
        .or_else(real_ip)
        .or_else(peer)
        .map(|ip| ip.to_string())
        .unwrap_or_default()
}

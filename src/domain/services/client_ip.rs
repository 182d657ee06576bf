//! Client IP Resolver
//!
//! Decides which address a lookup request is about. An explicit path
//! segment wins; otherwise the proxy headers and finally the transport
//! peer are consulted, in that order.

use crate::domain::entities::LookupRequestContext;
use crate::domain::errors::LookupError;
use std::net::IpAddr;

/// A single source of candidate IP strings.
type Strategy = fn(&LookupRequestContext) -> Option<String>;

/// Ordered candidate sources. The first one producing a non-empty
/// candidate decides; later sources are never consulted.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("path", from_path),
    ("x-forwarded-for", from_forwarded_for),
    ("x-real-ip", from_real_ip),
    ("peer", from_peer_addr),
];

pub struct ClientIpResolver;

impl ClientIpResolver {
    /// Resolve the IP to look up for this request.
    ///
    /// A non-empty candidate that fails to parse is an error; it does not
    /// fall through to the next source.
    pub fn resolve(ctx: &LookupRequestContext) -> Result<IpAddr, LookupError> {
        let (source, candidate) = STRATEGIES
            .iter()
            .find_map(|(name, strategy)| {
                strategy(ctx)
                    .filter(|c| !c.is_empty())
                    .map(|c| (*name, c))
            })
            .ok_or_else(LookupError::undeterminable_ip)?;

        // IPv4-mapped IPv6 addresses are treated as the IPv4 they carry.
        let ip = candidate
            .parse::<IpAddr>()
            .map_err(|_| LookupError::invalid_ip(&candidate))?
            .to_canonical();

        if ip.is_loopback() {
            tracing::warn!(
                "request IP is local ({}) from {}, geolocation may be limited",
                ip,
                source
            );
        } else {
            tracing::debug!("resolved client ip {} from {}", ip, source);
        }

        Ok(ip)
    }
}

fn from_path(ctx: &LookupRequestContext) -> Option<String> {
    ctx.path_ip.clone()
}

/// First entry of the proxy chain is the original client.
fn from_forwarded_for(ctx: &LookupRequestContext) -> Option<String> {
    let header = ctx.forwarded_for.as_deref()?;
    header.split(',').next().map(|s| s.trim().to_string())
}

fn from_real_ip(ctx: &LookupRequestContext) -> Option<String> {
    ctx.real_ip.as_deref().map(|s| s.trim().to_string())
}

fn from_peer_addr(ctx: &LookupRequestContext) -> Option<String> {
    let peer = ctx.peer_addr.as_deref()?;
    let host = split_host(peer).unwrap_or(peer);
    Some(host.to_string())
}

/// Strip a trailing `:port` from `host:port` or `[host]:port`.
///
/// Returns `None` when the address is not in host:port form, e.g. a bare
/// IPv6 address or a unix socket path.
fn split_host(addr: &str) -> Option<&str> {
    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        tail.strip_prefix(':')?;
        return Some(host);
    }

    let (host, _port) = addr.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some(host)
}

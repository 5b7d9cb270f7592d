//! Port selection helpers
//!
//! Convenience wrappers around bind-probing. The composition core never
//! calls these; they exist for dev-server launchers that want a usable
//! port before composing a configuration.

use tokio::net::TcpListener;
use tracing::debug;

use crate::error::{Error, Result};

async fn free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .map_err(|source| Error::PortUnavailable {
            preferred: 0,
            source,
        })?;
    Ok(listener.local_addr()?.port())
}

/// Choose a usable port, preferring the requested one.
///
/// Falls back to an OS-assigned free port when the preferred port is
/// taken. A preferred port of 0 always asks the OS.
pub async fn choose_port(preferred: u16) -> Result<u16> {
    if preferred != 0 {
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", preferred)).await {
            drop(listener);
            return Ok(preferred);
        }
        debug!(preferred, "preferred port unavailable; asking the OS");
    }
    free_port().await
}

/// Choose one usable port per request, never repeating a port within
/// the returned set.
pub async fn choose_ports(preferred: &[u16]) -> Result<Vec<u16>> {
    let mut chosen: Vec<u16> = Vec::with_capacity(preferred.len());
    for &port in preferred {
        let mut candidate = choose_port(port).await?;
        while chosen.contains(&candidate) {
            candidate = free_port().await?;
        }
        chosen.push(candidate);
    }
    Ok(chosen)
}

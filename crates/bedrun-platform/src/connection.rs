use std::fmt;

/// How players reach the server, for the operator-facing summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionInfo {
    Codespaces { address: String, port: u16 },
    Cloudflare { port: u16 },
    Local { port: u16 },
}

impl ConnectionInfo {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Codespaces { .. } => "codespaces",
            Self::Cloudflare { .. } => "cloudflare",
            Self::Local { .. } => "local",
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            Self::Codespaces { port, .. } | Self::Cloudflare { port } | Self::Local { port } => {
                *port
            }
        }
    }

    /// One-line instruction for making the address reachable.
    pub fn note(&self) -> &'static str {
        match self {
            Self::Codespaces { .. } => {
                "make the port public in the PORTS tab (right click -> Port Visibility -> Public)"
            }
            Self::Cloudflare { .. } => "tunnel active; the public hostname is in the tunnel logs",
            Self::Local { .. } => "reachable from this machine only",
        }
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codespaces { address, .. } => write!(f, "{address}"),
            Self::Cloudflare { port } => write!(f, "see tunnel logs (udp port {port})"),
            Self::Local { port } => write!(f, "localhost:{port}"),
        }
    }
}

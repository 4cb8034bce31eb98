//! GitHub Codespaces detection.
//!
//! Codespaces forwards ports natively, so inside a codespace the launcher
//! can skip the cloudflared tunnel and just print the forwarded address.

use std::env;

const DEFAULT_FORWARDING_DOMAIN: &str = "preview.app.github.dev";

/// Whether the launcher is running inside a GitHub Codespace.
pub fn detect() -> bool {
    is_codespaces(
        env::var("CODESPACES").ok().as_deref(),
        env::var("GITHUB_CODESPACES_PORT_FORWARDING_DOMAIN").ok().as_deref(),
    )
}

/// The externally forwarded address for `port`, when inside a codespace.
pub fn forwarded_address(port: u16) -> Option<String> {
    let name = env::var("CODESPACE_NAME").ok();
    let domain = env::var("GITHUB_CODESPACES_PORT_FORWARDING_DOMAIN").ok();
    if !detect() {
        return None;
    }
    Some(address_for(name.as_deref(), domain.as_deref(), port))
}

fn is_codespaces(codespaces: Option<&str>, forwarding_domain: Option<&str>) -> bool {
    codespaces == Some("true") || forwarding_domain.is_some()
}

fn address_for(name: Option<&str>, domain: Option<&str>, port: u16) -> String {
    format!(
        "{}-{}.{}",
        name.unwrap_or("unknown"),
        port,
        domain.unwrap_or(DEFAULT_FORWARDING_DOMAIN)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_or_domain_marks_codespaces() {
        assert!(is_codespaces(Some("true"), None));
        assert!(is_codespaces(None, Some("app.github.dev")));
        assert!(is_codespaces(Some("true"), Some("app.github.dev")));
    }

    #[test]
    fn neither_marker_means_not_codespaces() {
        assert!(!is_codespaces(None, None));
        assert!(!is_codespaces(Some("false"), None));
    }

    #[test]
    fn address_combines_name_port_and_domain() {
        let addr = address_for(Some("fuzzy-space"), Some("app.github.dev"), 19132);
        assert_eq!(addr, "fuzzy-space-19132.app.github.dev");
    }

    #[test]
    fn address_falls_back_to_defaults() {
        let addr = address_for(None, None, 19132);
        assert_eq!(addr, "unknown-19132.preview.app.github.dev");
    }
}

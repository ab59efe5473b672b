//! Origin/transport guard.
//!
//! Prevents DNS-rebinding style abuse: a present `Origin` header must be a
//! prefix match against the configured allow-list (scheme+host prefixes).
//! Requests without an Origin header are allowed, since not all clients send
//! one. Strict mode additionally requires https for non-loopback hosts.

/// Validate the declared origin and transport for one request.
pub fn validate(
    origin: Option<&str>,
    scheme: &str,
    host: &str,
    allowed_origins: &[String],
    strict: bool,
) -> bool {
    if let Some(origin) = origin {
        if !allowed_origins
            .iter()
            .any(|allowed| origin.starts_with(allowed.as_str()))
        {
            return false;
        }
    }

    if strict && scheme != "https" && !is_loopback(host) {
        return false;
    }

    true
}

fn is_loopback(host: &str) -> bool {
    let name = strip_port(host);
    name == "localhost" || name == "::1" || name.starts_with("127.")
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 like "[::1]:8080"
    if let Some(rest) = host.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return &rest[..end];
        }
    }
    host.split(':').next().unwrap_or(host)
}

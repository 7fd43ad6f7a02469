use url::Url;

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Extract the host portion of an absolute URL.
/// Returns `None` for relative, malformed or host-less input instead of failing.
/// Example: "https://github.com/foo/bar" -> Some("github.com")
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_string()),
        _ => None,
    }
}

/// Favicon lookup URL for a domain, empty when there is no domain to look up.
pub fn favicon_url(domain: &str) -> String {
    match domain.trim() {
        "" => String::new(),
        d => format!("{}?domain={}&sz=64", FAVICON_SERVICE, d),
    }
}

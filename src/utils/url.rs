use reqwest::Url;

/// Host portion of an image link, for the detail pane.
/// "https://cdn.example.com/pots/1.png" -> Some("cdn.example.com")
pub fn image_host(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    // Scheme-less links are common in hand-entered data
    let parsed = match Url::parse(link) {
        Ok(url) => url,
        Err(_) => Url::parse(&format!("http://{}", link)).ok()?,
    };

    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

/// Only web links are handed to the system opener.
pub fn is_openable(link: &str) -> bool {
    Url::parse(link.trim())
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

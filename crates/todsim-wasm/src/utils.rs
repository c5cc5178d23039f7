use web_sys::UrlSearchParams;

/// Query parameter of the current page, if present and non-empty
pub fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    params.get(name).filter(|v| !v.trim().is_empty())
}

/// First non-blank value
pub fn first_present(values: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
}

/// `HH:MM` of an RFC 3339 timestamp, or the input unchanged
pub fn format_time(timestamp: &str) -> String {
    match timestamp.get(11..16) {
        Some(time) if timestamp.as_bytes().get(10) == Some(&b'T') => time.to_string(),
        _ => timestamp.to_string(),
    }
}

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Encode pairs as `application/x-www-form-urlencoded`
pub fn form_encode(fields: &[(String, String)]) -> String {
    let params = match UrlSearchParams::new() {
        Ok(params) => params,
        Err(_) => return String::new(),
    };
    for (key, value) in fields {
        params.append(key, value);
    }
    params.to_string().into()
}

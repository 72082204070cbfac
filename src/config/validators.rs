// src/config/validators.rs
//
// One helper per constraint. Each returns the error line it contributes to
// the aggregated startup report; callers collect rather than short-circuit.

use std::path::Path;

use url::Url;

pub fn validate_directory(value: &str, var_name: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{var_name}: Directory path cannot be empty"));
    }
    let path = Path::new(value);
    if !path.exists() {
        return Some(format!("{var_name}: Directory '{value}' does not exist"));
    }
    if !path.is_dir() {
        return Some(format!("{var_name}: Path '{value}' is not a directory"));
    }
    // Probe writability the way the process will actually use the directory.
    let test_file = path.join(".write_test");
    match std::fs::write(&test_file, b"") {
        Ok(()) => {
            let _ = std::fs::remove_file(&test_file);
            None
        }
        Err(e) => Some(format!(
            "{var_name}: Directory '{value}' is not writable - {e}"
        )),
    }
}

pub fn validate_url(value: &str, var_name: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{var_name}: URL cannot be empty"));
    }
    match Url::parse(value) {
        Ok(parsed) => {
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Some(format!(
                    "{var_name}: URL must use http:// or https://, got: '{value}'"
                ));
            }
            if parsed.host_str().is_none() {
                return Some(format!("{var_name}: Invalid URL format: '{value}'"));
            }
            None
        }
        Err(e) => Some(format!("{var_name}: Failed to parse URL '{value}' - {e}")),
    }
}

pub fn validate_discord_webhook_url(value: &str, var_name: &str) -> Option<String> {
    if let Some(e) = validate_url(value, var_name) {
        return Some(e);
    }
    if !value.contains("/api/webhooks/") {
        return Some(format!(
            "{var_name}: Discord webhook URL must contain '/api/webhooks/', got: '{value}'"
        ));
    }
    let host = Url::parse(value)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_default();
    if !host.contains("discord.com") {
        return Some(format!(
            "{var_name}: Discord webhook URL must be from discord.com domain, got: '{host}'"
        ));
    }
    None
}

/// Parse and validate the JSON array of webhook URLs. Per-element failures
/// are folded into one multi-line error for the variable.
pub fn validate_discord_webhook_urls(value: &str, var_name: &str) -> Result<Vec<String>, String> {
    if value.is_empty() {
        return Err(format!("{var_name}: Value cannot be empty"));
    }
    let parsed: serde_json::Value = serde_json::from_str(value)
        .map_err(|e| format!("{var_name}: Invalid JSON format - {e}"))?;
    let serde_json::Value::Array(items) = parsed else {
        return Err(format!("{var_name}: Must be a JSON array"));
    };
    if items.is_empty() {
        return Err(format!(
            "{var_name}: Array cannot be empty, at least one webhook URL is required"
        ));
    }

    let mut urls = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match item.as_str() {
            None => errors.push(format!("  [{i}]: Must be a string")),
            Some(url) => match validate_discord_webhook_url(url, &format!("{var_name}[{i}]")) {
                Some(e) => errors.push(format!("  [{i}]: {e}")),
                None => urls.push(url.to_string()),
            },
        }
    }
    if !errors.is_empty() {
        return Err(format!(
            "{var_name}: Invalid webhook URL(s):\n{}",
            errors.join("\n")
        ));
    }
    Ok(urls)
}

pub fn validate_int_range(
    value: &str,
    var_name: &str,
    min: Option<u64>,
    max: Option<u64>,
    allowed: Option<&[u64]>,
) -> Result<u64, String> {
    if value.is_empty() {
        return Err(format!("{var_name}: Value cannot be empty"));
    }
    let v: u64 = value
        .parse()
        .map_err(|_| format!("{var_name}: Must be an integer, got: '{value}'"))?;
    if let Some(allowed) = allowed {
        if !allowed.contains(&v) {
            return Err(format!("{var_name}: Must be one of {allowed:?}, got: {v}"));
        }
    }
    if let Some(min) = min {
        if v < min {
            return Err(format!("{var_name}: Must be >= {min}, got: {v}"));
        }
    }
    if let Some(max) = max {
        if v > max {
            return Err(format!("{var_name}: Must be <= {max}, got: {v}"));
        }
    }
    Ok(v)
}

pub fn validate_selector(value: &str, var_name: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{var_name}: Selector cannot be empty"));
    }
    if scraper::Selector::parse(value).is_err() {
        return Some(format!("{var_name}: Invalid CSS selector: '{value}'"));
    }
    None
}

/// The time label is configured as a bare class name and matched as `.name`.
pub fn validate_class_name(value: &str, var_name: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{var_name}: Class name cannot be empty"));
    }
    let as_selector = format!(".{value}");
    if scraper::Selector::parse(&as_selector).is_err() {
        return Some(format!("{var_name}: Invalid class name: '{value}'"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_must_exist_and_be_a_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(validate_directory(tmp.path().to_str().unwrap(), "X").is_none());
        assert!(validate_directory("/definitely/not/here", "X")
            .unwrap()
            .contains("does not exist"));

        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        assert!(validate_directory(file.to_str().unwrap(), "X")
            .unwrap()
            .contains("is not a directory"));
    }

    #[test]
    fn url_requires_http_scheme_and_host() {
        assert!(validate_url("https://example.com/a", "X").is_none());
        assert!(validate_url("ftp://example.com", "X")
            .unwrap()
            .contains("http:// or https://"));
        assert!(validate_url("", "X").unwrap().contains("cannot be empty"));
        assert!(validate_url("not a url", "X").is_some());
    }

    #[test]
    fn discord_webhook_url_shape_is_enforced() {
        let ok = "https://discord.com/api/webhooks/123/token";
        assert!(validate_discord_webhook_url(ok, "X").is_none());
        assert!(
            validate_discord_webhook_url("https://discord.com/other/123", "X")
                .unwrap()
                .contains("/api/webhooks/")
        );
        assert!(
            validate_discord_webhook_url("https://example.com/api/webhooks/123/t", "X")
                .unwrap()
                .contains("discord.com")
        );
    }

    #[test]
    fn webhook_array_rejects_empty_and_non_strings() {
        let err = validate_discord_webhook_urls("[]", "X").unwrap_err();
        assert!(err.contains("Array cannot be empty"));

        let err = validate_discord_webhook_urls("{}", "X").unwrap_err();
        assert!(err.contains("Must be a JSON array"));

        let err = validate_discord_webhook_urls("[42]", "X").unwrap_err();
        assert!(err.contains("Must be a string"));

        let err = validate_discord_webhook_urls("not json", "X").unwrap_err();
        assert!(err.contains("Invalid JSON format"));
    }

    #[test]
    fn webhook_array_accepts_valid_urls() {
        let raw = r#"["https://discord.com/api/webhooks/1/a", "https://discord.com/api/webhooks/2/b"]"#;
        let urls = validate_discord_webhook_urls(raw, "X").unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn int_range_checks_bounds_and_allowed_values() {
        assert_eq!(validate_int_range("30", "X", Some(1), Some(300), None), Ok(30));
        assert!(validate_int_range("0", "X", Some(1), None, None)
            .unwrap_err()
            .contains(">= 1"));
        assert!(validate_int_range("301", "X", Some(1), Some(300), None)
            .unwrap_err()
            .contains("<= 300"));
        assert!(validate_int_range("abc", "X", None, None, None)
            .unwrap_err()
            .contains("Must be an integer"));
        assert!(
            validate_int_range("25", "X", None, None, Some(&[10, 20, 30]))
                .unwrap_err()
                .contains("Must be one of")
        );
    }

    #[test]
    fn selectors_must_parse() {
        assert!(validate_selector("article", "X").is_none());
        assert!(validate_selector("div.alert > p", "X").is_none());
        assert!(validate_selector("", "X").unwrap().contains("cannot be empty"));
        assert!(validate_selector("ar[ticle", "X")
            .unwrap()
            .contains("Invalid CSS selector"));
        assert!(validate_class_name("text-left", "X").is_none());
        assert!(validate_class_name("bad(class", "X")
            .unwrap()
            .contains("Invalid class name"));
    }
}

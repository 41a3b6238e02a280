use crate::errors::SyncTestError;

/// Validates an HTTP/HTTPS backend URL
pub fn validate_http_url(value: &str) -> Result<(), SyncTestError> {
    let invalid = |reason: String| SyncTestError::InvalidBackendUrl(reason);

    if value.trim().is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }
    let url = url::Url::parse(value).map_err(|e| invalid(format!("{e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(invalid("URL must use http or https scheme".to_string())),
    }
    if url.host_str().filter(|h| !h.is_empty()).is_none() {
        return Err(invalid("URL must have a valid host".to_string()));
    }
    Ok(())
}

/// Validates a source short name, which is interpolated into URL paths
pub fn validate_short_name(value: &str) -> Result<(), SyncTestError> {
    let invalid = |reason: &str| SyncTestError::InvalidArgument {
        name: "short_name",
        reason: reason.to_string(),
    };

    if value.trim().is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid("may only contain letters, digits, '_' and '-'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("http://localhost:8001").is_ok());
        assert!(validate_http_url("https://api.example.com").is_ok());
        assert_eq!(
            validate_http_url("ftp://localhost").unwrap_err().to_string(),
            "Invalid backend URL: URL must use http or https scheme"
        );
        assert_eq!(
            validate_http_url("localhost:8001/api").unwrap_err().to_string(),
            "Invalid backend URL: URL must use http or https scheme"
        );
        assert_eq!(
            validate_http_url("backend").unwrap_err().to_string(),
            "Invalid backend URL: relative URL without a base"
        );
        assert_eq!(
            validate_http_url(" ").unwrap_err().to_string(),
            "Invalid backend URL: URL cannot be empty"
        );
    }

    #[test]
    fn test_validate_short_name() {
        assert!(validate_short_name("google_drive").is_ok());
        assert!(validate_short_name("slack-v2").is_ok());
        assert!(validate_short_name("").is_err());
        assert!(validate_short_name("../admin").is_err());
        assert!(validate_short_name("a b").is_err());
    }
}

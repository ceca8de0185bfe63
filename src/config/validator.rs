//! Router options validation.

use crate::config::RouterOptions;
use crate::error::ConfigError;

pub fn validate(options: &RouterOptions) -> Result<(), ConfigError> {
    if let Some(path) = options.base_path.as_deref().filter(|p| !p.is_empty()) {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!("base path must start with '/': {}", path)));
        }
        if path.len() > 1 && path.ends_with('/') {
            return Err(ConfigError::Validation(format!("base path must not end with '/': {}", path)));
        }
    }
    if let Some(url) = &options.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!("base url must be http(s): {}", url)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_defaults_and_root() {
        assert!(validate(&RouterOptions::default()).is_ok());
        assert!(validate(&RouterOptions::default().with_base_path("/")).is_ok());
        assert!(validate(&RouterOptions::default().with_base_path("/api/v1")).is_ok());
    }

    #[test]
    fn test_rejects_malformed_base_path() {
        let err = validate(&RouterOptions::default().with_base_path("api")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(validate(&RouterOptions::default().with_base_path("/api/")).is_err());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(validate(&RouterOptions::default().with_base_url("ftp://example.com")).is_err());
        assert!(validate(&RouterOptions::default().with_base_url("https://example.com")).is_ok());
    }
}

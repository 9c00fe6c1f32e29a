use std::{collections::HashMap, fs};

/// Collection endpoint used when nothing is configured.
pub const DEFAULT_API_URL: &str = "https://placeholder.api/contact";
/// Widget site key used when nothing is configured.
pub const DEFAULT_SITE_KEY: &str = "your-site-key-here";

/// Explicit configuration handed to client construction. Both values are
/// opaque strings to the clients; neither is parsed or normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    pub api_url: String,
    pub site_key: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            site_key: DEFAULT_SITE_KEY.into(),
        }
    }
}

impl ContactConfig {
    pub fn new(api_url: impl Into<String>, site_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            site_key: site_key.into(),
        }
    }

    /// Read endpoint for stored submissions, derived from the collection
    /// endpoint: a trailing `/contact` segment is replaced by
    /// `/submissions`, anything else gets `/submissions` appended.
    pub fn submissions_url(&self) -> String {
        let base = self.api_url.trim_end_matches('/');
        let base = base.strip_suffix("/contact").unwrap_or(base);
        format!("{base}/submissions")
    }
}

/// Resolves configuration the way the binaries do: built-in defaults, then a
/// `contact.toml` in the working directory, then environment overrides.
/// A missing or malformed file is treated as absent.
pub fn load_settings() -> ContactConfig {
    let mut settings = ContactConfig::default();

    if let Ok(raw) = fs::read_to_string("contact.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_url") {
                settings.api_url = v.clone();
            }
            if let Some(v) = file_cfg.get("site_key") {
                settings.site_key = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("CONTACT_API_URL") {
        settings.api_url = v;
    }
    if let Ok(v) = std::env::var("CONTACT_SITE_KEY") {
        settings.site_key = v;
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_placeholder_endpoint() {
        let config = ContactConfig::default();
        assert_eq!(config.api_url, "https://placeholder.api/contact");
        assert_eq!(config.site_key, "your-site-key-here");
    }

    #[test]
    fn submissions_url_replaces_trailing_contact_segment() {
        let config = ContactConfig::new("https://api.example.com/contact", "key");
        assert_eq!(
            config.submissions_url(),
            "https://api.example.com/submissions"
        );
    }

    #[test]
    fn submissions_url_ignores_trailing_slash() {
        let config = ContactConfig::new("https://api.example.com/contact/", "key");
        assert_eq!(
            config.submissions_url(),
            "https://api.example.com/submissions"
        );
    }

    #[test]
    fn submissions_url_appends_when_endpoint_has_no_contact_segment() {
        let config = ContactConfig::new("https://api.example.com/v2/forms", "key");
        assert_eq!(
            config.submissions_url(),
            "https://api.example.com/v2/forms/submissions"
        );
    }

    #[test]
    fn environment_overrides_win_over_defaults() {
        std::env::set_var("CONTACT_API_URL", "https://env.example.com/contact");
        std::env::set_var("CONTACT_SITE_KEY", "env-site-key");

        let settings = load_settings();
        assert_eq!(settings.api_url, "https://env.example.com/contact");
        assert_eq!(settings.site_key, "env-site-key");

        std::env::remove_var("CONTACT_API_URL");
        std::env::remove_var("CONTACT_SITE_KEY");
    }
}

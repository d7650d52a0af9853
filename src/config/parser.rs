use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use crate::config::{Renderer, ScopeMode};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawl]
url = "example.com"
keyword = "rust"
scope = "single-page"
page = "https://example.com/about"
render-visible = true

[content]
images = true
videos = true
ocr = false

[output]
folder = "out"
format = "csv"

[fetch]
renderer = "browser"
page-timeout-secs = 45
browser-binary = "google-chrome"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.url.as_deref(), Some("example.com"));
        assert_eq!(config.crawl.scope, ScopeMode::SinglePage);
        assert!(config.crawl.render_visible);
        assert!(config.content.images);
        assert_eq!(config.output.format, "csv");
        assert_eq!(config.fetch.renderer, Renderer::Browser);
        assert_eq!(config.fetch.page_timeout_secs, 45);
        assert_eq!(config.fetch.ocr_binary, "tesseract");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert!(config.crawl.url.is_none());
        assert_eq!(config.crawl.scope, ScopeMode::WholeSite);
        assert_eq!(config.output.folder, "results");
        assert_eq!(config.output.format, "json");
        assert_eq!(config.fetch.renderer, Renderer::Http);
        assert_eq!(config.fetch.page_timeout_secs, 30);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/gleaner.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[output]\nformat = \"bogus\"\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}

// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load a YAML or JSON configuration file and validate it.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(path, &contents)?;
    config.validate()?;
    Ok(config)
}

/// `.yaml`/`.yml` files are YAML, anything else is JSON.
fn parse_config(path: &Path, contents: &str) -> Result<Config> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(contents).context("Failed to parse YAML config"),
        _ => serde_json::from_str(contents).context("Failed to parse JSON config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.probe.timeout(), Duration::from_secs(3));
        assert_eq!(config.probe.concurrency, 1);
        assert!(!config.probe.short_circuit);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.output.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "probe:\n  timeout_secs: 5\n  short_circuit: true\noutput:\n  format: json\n";
        let config = parse_config(Path::new("lb-check.yaml"), yaml).unwrap();

        assert_eq!(config.probe.timeout_secs, 5);
        assert!(config.probe.short_circuit);
        assert_eq!(config.probe.concurrency, 1);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.verbose);
    }

    #[test]
    fn test_json_config() {
        let json = r#"{"fail_on_unhealthy": true, "probe": {"concurrency": 8}}"#;
        let config = parse_config(Path::new("lb-check.json"), json).unwrap();

        assert!(config.fail_on_unhealthy);
        assert_eq!(config.probe.concurrency, 8);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let yaml = "probe:\n  timout_secs: 5\n";
        assert!(parse_config(Path::new("lb-check.yml"), yaml).is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.probe.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.probe.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_config_validates() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"probe:\n  concurrency: 0\n").unwrap();

        let err = load_config(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("concurrency"));
    }
}

use std::path::Path;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use kessel_inventory_sdk::Config;

/// Prefix of environment overrides, e.g. `KESSEL_OIDC__CLIENT_ID`.
pub const ENV_PREFIX: &str = "KESSEL_";

/// Top-level `Config` keys read from the environment. Other `KESSEL_*`
/// variables belong to other tools and are ignored.
const ENV_KEYS: &[&str] = &[
    "url",
    "http_url",
    "insecure",
    "tls",
    "enable_oidc_auth",
    "oidc",
    "connect_timeout",
    "request_timeout",
];

fn is_config_key(key: &str) -> bool {
    let top = key.split('.').next().unwrap_or(key);
    ENV_KEYS.iter().any(|k| k.eq_ignore_ascii_case(top))
}

/// Load the client configuration.
///
/// Layers, lowest first: built-in defaults, the YAML file (if given), then
/// `KESSEL_*` environment variables with `__` separating nested keys. Only
/// variables naming a known top-level key are read.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::new();
    if let Some(path) = path {
        if !path.is_file() {
            bail!("config file does not exist: {}", path.display());
        }
        figment = figment.merge(Yaml::file(path));
    }
    figment = figment.merge(
        Env::prefixed(ENV_PREFIX)
            .split("__")
            .filter(|key| is_config_key(key.as_str())),
    );

    let config: Config = figment
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "url: inventory.example.com:443\ninsecure: true\nrequest_timeout: 5s\noidc:\n  scopes: [api.iam]"
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.url, "inventory.example.com:443");
        assert!(config.insecure);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.oidc.scopes, vec!["api.iam".to_owned()]);
    }

    #[test]
    fn only_known_keys_are_read_from_env() {
        assert!(is_config_key("url"));
        assert!(is_config_key("REQUEST_TIMEOUT"));
        assert!(is_config_key("oidc.client_id"));
        assert!(!is_config_key("log_dir"));
        assert!(!is_config_key("urls"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load(Some(Path::new("/nonexistent/kessel.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connect_timeout: soon").unwrap();
        let err = load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load configuration"));
    }
}

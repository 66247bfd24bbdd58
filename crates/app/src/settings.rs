//! Settings for the `folio` binary.
//!
//! Sources, later ones winning: built-in defaults, the optional TOML file
//! (`folio.toml` unless `--config` says otherwise), then `FOLIO_*`
//! environment variables with `__` as the section separator, e.g.
//! `FOLIO_REPORT__PAGE_SIZE=50`.
use config::{Config, Environment, File};
use engine::EngineConfig;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "folio.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for `folio` and `engine` targets.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub report: EngineConfig,
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let settings = Settings::load(Some("does/not/exist/folio")).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.report, EngineConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[app]\nlevel = \"debug\"\n\n[report]\npage_size = 50\nparallel = false"
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.report.page_size, 50);
        assert!(!settings.report.parallel);
        assert_eq!(settings.report.max_page_size, 200);
    }
}

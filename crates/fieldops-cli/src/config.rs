// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use fieldops_app::EntityKind;
use fieldops_table::{DEFAULT_PAGE_SIZE, ExportFormat};
use fieldops_testkit::SeedCounts;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "fieldops";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub table: Table,
    #[serde(default)]
    pub seed: Seed,
    #[serde(default)]
    pub export: Export,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            table: Table::default(),
            seed: Seed::default(),
            export: Export::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    pub page_size: Option<i64>,
    pub default_entity: Option<String>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE as i64),
            default_entity: Some(EntityKind::Customers.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    pub seed: Option<u64>,
    pub customers: Option<usize>,
    pub work_orders: Option<usize>,
    pub invoices: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Export {
    pub format: Option<String>,
    pub dir: Option<String>,
}

impl Default for Export {
    fn default() -> Self {
        Self {
            format: Some(ExportFormat::default().as_str().to_owned()),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("FIELDOPS_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set FIELDOPS_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` at the top and keep values under [table], [seed], [export], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(page_size) = self.table.page_size
            && page_size <= 0
        {
            bail!(
                "table.page_size in {} must be positive, got {}",
                path.display(),
                page_size
            );
        }

        if let Some(entity) = &self.table.default_entity
            && EntityKind::parse(entity).is_none()
        {
            bail!(
                "table.default_entity in {} must be one of customers, work_orders, invoices; got {:?}",
                path.display(),
                entity
            );
        }

        if let Some(format) = &self.export.format
            && ExportFormat::parse(format).is_none()
        {
            bail!(
                "export.format in {} must be csv or json; got {:?}",
                path.display(),
                format
            );
        }

        if let Some(dir) = &self.export.dir
            && dir.trim().is_empty()
        {
            bail!(
                "export.dir in {} is empty; remove it to export into the current directory",
                path.display()
            );
        }

        Ok(())
    }

    pub fn page_size(&self) -> usize {
        self.table
            .page_size
            .and_then(|value| usize::try_from(value).ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn default_entity(&self) -> EntityKind {
        self.table
            .default_entity
            .as_deref()
            .and_then(EntityKind::parse)
            .unwrap_or(EntityKind::Customers)
    }

    pub fn seed(&self) -> u64 {
        self.seed.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn seed_counts(&self) -> SeedCounts {
        let defaults = SeedCounts::default();
        SeedCounts {
            customers: self.seed.customers.unwrap_or(defaults.customers),
            work_orders: self.seed.work_orders.unwrap_or(defaults.work_orders),
            invoices: self.seed.invoices.unwrap_or(defaults.invoices),
        }
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export
            .format
            .as_deref()
            .and_then(ExportFormat::parse)
            .unwrap_or_default()
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .dir
            .as_deref()
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file to an absolute path")
        })?;
        Ok(data_root.join(APP_NAME).join("fieldops.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# fieldops config\n# Place this file at: {}\n\nversion = 1\n\n[table]\npage_size = {}\ndefault_entity = \"customers\"\n\n[seed]\nseed = {}\ncustomers = 25\nwork_orders = 40\ninvoices = 30\n\n[export]\nformat = \"csv\"\n# Optional. Default is the current directory\n# dir = \"/absolute/export/dir\"\n\n[log]\n# RUST_LOG overrides this directive\nlevel = \"{}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/fieldops/fieldops.log)\n# file = \"/absolute/path/fieldops.log\"\n",
            path.display(),
            DEFAULT_PAGE_SIZE,
            DEFAULT_SEED,
            DEFAULT_LOG_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use fieldops_app::EntityKind;
    use fieldops_table::ExportFormat;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.default_entity(), EntityKind::Customers);
        assert_eq!(config.seed(), 42);
        assert_eq!(config.seed_counts().customers, 25);
        assert_eq!(config.export_format(), ExportFormat::Csv);
        assert_eq!(config.export_dir(), PathBuf::from("."));
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[table]\npage_size = 5\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[table], [seed], [export], and [log]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[table]\npage_size = 25\ndefault_entity = \"work_orders\"\n[seed]\nseed = 9\ninvoices = 3\n[export]\nformat = \"json\"\ndir = \"/tmp/exports\"\n[log]\nlevel = \"debug\"\nfile = \"/tmp/fieldops.log\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.default_entity(), EntityKind::WorkOrders);
        assert_eq!(config.seed(), 9);
        let counts = config.seed_counts();
        assert_eq!((counts.customers, counts.invoices), (25, 3));
        assert_eq!(config.export_format(), ExportFormat::Json);
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_file()?, PathBuf::from("/tmp/fieldops.log"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn non_positive_page_size_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[table]\npage_size = 0\n")?;
        let error = Config::load(&path).expect_err("zero page size should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn unknown_entity_and_format_are_rejected() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[table]\ndefault_entity = \"vendors\"\n")?;
        let error = Config::load(&path).expect_err("unknown entity should fail");
        assert!(error.to_string().contains("default_entity"));

        let (_temp, path) = write_config("version = 1\n[export]\nformat = \"xlsx\"\n")?;
        let error = Config::load(&path).expect_err("unknown format should fail");
        assert!(error.to_string().contains("csv or json"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("FIELDOPS_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("FIELDOPS_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("FIELDOPS_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("fieldops/config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.seed_counts().work_orders, 40);
        Ok(())
    }
}

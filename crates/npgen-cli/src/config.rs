// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use npgen_app::{
    ChoiceGroup, ChoiceKind, CodeCatalog, DEFAULT_NUMBER, DEFAULT_NUMBERS, DEFAULT_SECTION,
    DEFAULT_SECTIONS, WidgetParts,
};
use npgen_tui::FeedbackDurations;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_COPIED_FEEDBACK: &str = "2s";
const DEFAULT_ERROR_FEEDBACK: &str = "500ms";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub codes: Codes,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            codes: Codes::default(),
            ui: Ui::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Codes {
    pub sections: Option<Vec<String>>,
    pub default_section: Option<String>,
    pub numbers: Option<Vec<String>>,
    pub default_number: Option<String>,
}

impl Default for Codes {
    fn default() -> Self {
        Self {
            sections: Some(DEFAULT_SECTIONS.iter().map(|tag| (*tag).to_owned()).collect()),
            default_section: Some(DEFAULT_SECTION.to_owned()),
            numbers: Some(DEFAULT_NUMBERS.iter().map(|tag| (*tag).to_owned()).collect()),
            default_number: Some(DEFAULT_NUMBER.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub copy_button: Option<bool>,
    pub theme_toggle: Option<bool>,
    pub copied_feedback: Option<String>,
    pub error_feedback: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            copy_button: Some(true),
            theme_toggle: Some(true),
            copied_feedback: Some(DEFAULT_COPIED_FEEDBACK.to_owned()),
            error_feedback: Some(DEFAULT_ERROR_FEEDBACK.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("NPGEN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set NPGEN_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(npgen_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
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
                    "config file {} has no `version`; add `version = 1` at the top",
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
        if let Some(db_path) = &self.storage.db_path {
            npgen_db::validate_db_path(db_path)?;
        }

        self.catalog()
            .with_context(|| format!("invalid [codes] in {}", path.display()))?;

        for (field, raw) in [
            ("ui.copied_feedback", &self.ui.copied_feedback),
            ("ui.error_feedback", &self.ui.error_feedback),
        ] {
            if let Some(raw) = raw {
                let parsed = parse_duration(raw)?;
                if parsed <= Duration::ZERO {
                    bail!(
                        "{field} in {} must be positive, got {raw}",
                        path.display()
                    );
                }
            }
        }

        if let Some(level) = &self.logging.level
            && !matches!(
                level.to_ascii_lowercase().as_str(),
                "trace" | "debug" | "info" | "warn" | "error" | "off"
            )
        {
            bail!(
                "logging.level in {} must be one of trace, debug, info, warn, error, off; got {level:?}",
                path.display()
            );
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => npgen_db::default_db_path(),
        }
    }

    pub fn catalog(&self) -> Result<CodeCatalog> {
        let defaults = Codes::default();
        let sections = ChoiceGroup::new(
            ChoiceKind::Section,
            self.codes
                .sections
                .as_ref()
                .or(defaults.sections.as_ref())
                .into_iter()
                .flatten(),
            self.codes
                .default_section
                .as_deref()
                .unwrap_or(DEFAULT_SECTION),
        )?;
        let numbers = ChoiceGroup::new(
            ChoiceKind::Number,
            self.codes
                .numbers
                .as_ref()
                .or(defaults.numbers.as_ref())
                .into_iter()
                .flatten(),
            self.codes.default_number.as_deref().unwrap_or(DEFAULT_NUMBER),
        )?;
        CodeCatalog::new(sections, numbers)
    }

    pub fn widget_parts(&self) -> WidgetParts {
        WidgetParts {
            copy_button: self.ui.copy_button.unwrap_or(true),
            theme_toggle: self.ui.theme_toggle.unwrap_or(true),
        }
    }

    pub fn feedback_durations(&self) -> Result<FeedbackDurations> {
        Ok(FeedbackDurations {
            copied: parse_duration(
                self.ui
                    .copied_feedback
                    .as_deref()
                    .unwrap_or(DEFAULT_COPIED_FEEDBACK),
            )?,
            error: parse_duration(
                self.ui
                    .error_feedback
                    .as_deref()
                    .unwrap_or(DEFAULT_ERROR_FEEDBACK),
            )?,
        })
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(npgen_db::data_dir()?.join("npgen.log")),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# npgen config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/npgen/npgen.db)\n# db_path = \"/absolute/path/to/npgen.db\"\n\n[codes]\nsections = [{}]\ndefault_section = \"{}\"\nnumbers = [{}]\ndefault_number = \"{}\"\n\n[ui]\ncopy_button = true\ntheme_toggle = true\ncopied_feedback = \"{}\"\nerror_feedback = \"{}\"\n\n[logging]\nlevel = \"{}\"\n# file = \"/absolute/path/to/npgen.log\"\n",
            path.display(),
            quoted_list(&DEFAULT_SECTIONS),
            DEFAULT_SECTION,
            quoted_list(&DEFAULT_NUMBERS),
            DEFAULT_NUMBER,
            DEFAULT_COPIED_FEEDBACK,
            DEFAULT_ERROR_FEEDBACK,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn quoted_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| format!("\"{value}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid feedback duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid feedback duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid feedback duration {raw:?}"))?;
        let secs = mins.checked_mul(60).ok_or_else(|| {
            anyhow!("feedback duration {raw:?} is too large; use a value under a few minutes")
        })?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 2s)")
}

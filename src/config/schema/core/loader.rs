use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.breathu/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let breathu_dir = home.join(".breathu");

        if !breathu_dir.exists() {
            fs::create_dir_all(&breathu_dir).context("Failed to create .breathu directory")?;
        }

        let config_path = breathu_dir.join("config.toml");
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self {
                config_path,
                data_dir: breathu_dir,
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    /// Load a specific file; its parent directory becomes the data directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        config.config_path = path.to_path_buf();
        config.data_dir = path
            .parent()
            .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// TOML rendering with secrets masked, for `breathu config`.
    pub fn redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.feedback.has_api_key() {
            shown.feedback.api_key = Some("***".into());
        }
        if shown.affect.external_token.is_some() {
            shown.affect.external_token = Some("***".into());
        }
        toml::to_string_pretty(&shown).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_sets_paths_and_reads_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[feedback]
model = "custom/model"
max_retries = 5

[calendar]
window_days = 2
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.feedback.model, "custom/model");
        assert_eq!(config.feedback.max_retries, 5);
        assert_eq!(config.calendar.window_days, 2);
        assert_eq!(config.config_path, path);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[feedback]\nmax_retries = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            config_path: dir.path().join("config.toml"),
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        config.storage.enabled = true;
        config.save().unwrap();

        let loaded = Config::load_from(&config.config_path).unwrap();
        assert!(loaded.storage.enabled);
    }

    #[test]
    fn redacted_toml_masks_secrets() {
        let mut config = Config::default();
        config.feedback.api_key = Some("sk-live-secret".into());
        config.affect.external_token = Some("hf_secret".into());

        let shown = config.redacted_toml().unwrap();
        assert!(!shown.contains("sk-live-secret"));
        assert!(!shown.contains("hf_secret"));
        assert!(shown.contains("***"));
    }
}

use serde::{Deserialize, Serialize};
use sitecraft_editor::EditorOptions;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "sitecraft.config.json";

/// Sitecraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// JSON file holding the site (pages, blocks, theme)
    #[serde(default = "default_site_file")]
    pub site_file: String,

    /// Directory of the local block store
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Editor session options
    #[serde(default)]
    pub editor: EditorOptions,
}

fn default_site_file() -> String {
    "site.json".to_string()
}

fn default_store_dir() -> String {
    ".sitecraft".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_site_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.site_file)
    }

    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_file: default_site_file(),
            store_dir: default_store_dir(),
            editor: EditorOptions::default(),
        }
    }
}

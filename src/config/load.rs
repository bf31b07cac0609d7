use crate::config::types::{Config, SETTINGS_FILE};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

impl Config {
    /// 從目前工作目錄載入設定，找不到或無法解析時使用預設值
    pub fn new() -> Self {
        Self::load_from_dir(Path::new("."))
    }

    pub fn load_from_dir(directory: &Path) -> Self {
        let path = directory.join(SETTINGS_FILE);
        if !path.exists() {
            debug!("找不到設定檔，使用預設值: {}", path.display());
            return Self::default();
        }

        match Self::load_settings(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("設定檔載入失敗，使用預設值: {e:#}");
                Self::default()
            }
        }
    }

    fn load_settings(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

use serde::Deserialize;
use std::path::PathBuf;

/// 設定檔名稱，放在執行時的工作目錄
pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_SOURCE_EXTENSION: &str = "heic";
pub const DEFAULT_TARGET_EXTENSION: &str = "jpg";

/// HEIC 轉檔設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// 手動指定的 ImageMagick 執行檔路徑，優先於自動偵測
    pub magick_path: Option<PathBuf>,
    /// 來源副檔名（不含前導點，不分大小寫）
    pub source_extension: String,
    /// 輸出副檔名（不含前導點）
    pub target_extension: String,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            magick_path: None,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub converter: ConverterSettings,
}

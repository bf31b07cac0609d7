use crate::tools::display_name;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 刪除結果
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// 已刪除的檔案
    pub removed: Vec<PathBuf>,
    /// 刪除失敗的檔案與錯誤訊息
    pub failed: Vec<(PathBuf, String)>,
}

impl RemovalReport {
    /// 嘗試刪除單一檔案並記錄結果，失敗不會中斷呼叫端
    pub fn remove(&mut self, path: &Path) {
        match remove_file(path) {
            Ok(()) => {
                debug!("已刪除: {}", path.display());
                self.removed.push(path.to_path_buf());
            }
            Err(e) => {
                warn!("刪除失敗 {}: {e:#}", path.display());
                self.failed.push((path.to_path_buf(), format!("{e:#}")));
            }
        }
    }

    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("Failed to delete {}", display_name(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_tracks_success_and_failure() {
        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().join("exists.txt");
        let missing = temp_dir.path().join("missing.txt");
        fs::write(&existing, "x").unwrap();

        let mut report = RemovalReport::default();
        report.remove(&missing);
        report.remove(&existing);

        // 第一個失敗不影響後續刪除
        assert_eq!(report.removed, vec![existing.clone()]);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed[0].0, missing);
        assert!(!existing.exists());
    }
}

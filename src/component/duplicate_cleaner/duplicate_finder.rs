//! 編號重複檔偵測
//!
//! 檔案管理員複製同名檔案時會加上 `(1)`、`(2)` 之類的編號，
//! 只要檔名中括號數字後面緊接著點號與副檔名即視為重複檔

use crate::tools::{RemovalReport, list_files_matching};
use anyhow::Result;
use log::{debug, info};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

// 規則刻意寬鬆，例如 `Q(3).report.csv` 也會符合
static REGEX_NUMBERED_DUPLICATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\(\d+\)\..*$").expect("Invalid regex"));

/// 判斷檔名是否帶有編號重複標記
#[must_use]
pub fn is_numbered_duplicate(file_name: &str) -> bool {
    REGEX_NUMBERED_DUPLICATE.is_match(file_name)
}

pub struct DuplicateFinder {
    shutdown_signal: Arc<AtomicBool>,
}

impl DuplicateFinder {
    #[must_use]
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    /// 列出目錄中檔名符合重複標記的一般檔案
    pub fn find(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let duplicates = list_files_matching(directory, |path| {
            path.file_name()
                .is_some_and(|name| is_numbered_duplicate(&name.to_string_lossy()))
        })?;

        info!(
            "在 {} 找到 {} 個重複檔",
            directory.display(),
            duplicates.len()
        );

        Ok(duplicates)
    }

    /// 逐一刪除，單一檔案失敗不影響其他檔案
    #[must_use]
    pub fn delete(&self, duplicates: &[PathBuf]) -> RemovalReport {
        let mut report = RemovalReport::default();

        for path in duplicates {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                info!("收到中斷訊號，停止刪除");
                break;
            }
            debug!("刪除重複檔: {}", path.display());
            report.remove(path);
        }

        info!(
            "重複檔刪除完成 - 刪除: {}, 失敗: {}",
            report.removed_count(),
            report.failed_count()
        );

        report
    }
}

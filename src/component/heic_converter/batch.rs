//! 批次轉檔與轉檔後刪除原檔

use super::magick_command::MagickCommand;
use crate::config::ConverterSettings;
use crate::tools::{RemovalReport, has_extension, list_files_matching};
use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 單一檔案的轉檔結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// 已呼叫外部工具並成功轉檔
    Converted,
    /// 輸出檔已存在，未呼叫外部工具
    Skipped,
    /// 轉檔失敗，附上錯誤訊息
    Failed(String),
}

/// 批次轉檔過程中的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionEvent<'a> {
    /// 即將呼叫外部工具；輸出檔已存在而跳過的檔案不會有此事件
    Started,
    /// 單一檔案處理完成
    Finished(&'a ConversionOutcome),
}

/// 一次批次轉檔的統計
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 因中斷而未處理的檔案數
    pub not_processed: usize,
}

impl ConversionSummary {
    /// 成功數：新轉檔加上已存在輸出檔的檔案
    #[must_use]
    pub const fn succeeded(&self) -> usize {
        self.converted + self.skipped
    }

    fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted => self.converted += 1,
            ConversionOutcome::Skipped => self.skipped += 1,
            ConversionOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// 刪除原檔的結果
#[derive(Debug, Default)]
pub struct SourceDeletionReport {
    pub removal: RemovalReport,
    /// 沒有對應輸出檔而保留的原檔
    pub kept_without_target: Vec<PathBuf>,
}

pub struct BatchConverter {
    tool_path: PathBuf,
    source_extension: String,
    target_extension: String,
    shutdown_signal: Arc<AtomicBool>,
}

impl BatchConverter {
    #[must_use]
    pub fn new(
        tool_path: impl Into<PathBuf>,
        settings: &ConverterSettings,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            tool_path: tool_path.into(),
            source_extension: settings.source_extension.clone(),
            target_extension: settings.target_extension.clone(),
            shutdown_signal,
        }
    }

    /// 列出目錄中副檔名相符（不分大小寫）的來源檔
    pub fn find_sources(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let sources =
            list_files_matching(directory, |path| has_extension(path, &self.source_extension))?;
        debug!(
            "在 {} 找到 {} 個 .{} 檔案",
            directory.display(),
            sources.len(),
            self.source_extension
        );
        Ok(sources)
    }

    #[must_use]
    pub fn target_path(&self, source: &Path) -> PathBuf {
        MagickCommand::generate_destination_path(source, &self.target_extension)
    }

    /// 轉換單一檔案；輸出檔已存在時跳過，失敗不會回傳錯誤而是以結果表示
    #[must_use]
    pub fn convert_one(&self, source: &Path) -> ConversionOutcome {
        let command = MagickCommand::new(&self.tool_path, source, &self.target_extension);

        if command.destination_path().exists() {
            debug!("輸出檔已存在，跳過: {}", command.destination_path().display());
            return ConversionOutcome::Skipped;
        }

        let output = match command.build_command().output() {
            Ok(output) => output,
            Err(e) => {
                warn!("無法執行 {}: {e}", self.tool_path.display());
                return ConversionOutcome::Failed(format!(
                    "failed to run {}: {e}",
                    self.tool_path.display()
                ));
            }
        };

        if output.status.success() {
            ConversionOutcome::Converted
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                "轉檔失敗 {} ({}): {stderr}",
                source.display(),
                output.status
            );
            let message = if stderr.is_empty() {
                format!("conversion tool exited with {}", output.status)
            } else {
                stderr
            };
            ConversionOutcome::Failed(message)
        }
    }

    /// 依序轉換所有來源檔，呼叫外部工具前與每個檔案完成後都會呼叫 `on_event`
    ///
    /// 單一檔案失敗不會中斷批次；收到中斷訊號時在檔案之間停止
    pub fn convert_all<F>(&self, sources: &[PathBuf], mut on_event: F) -> ConversionSummary
    where
        F: FnMut(&Path, ConversionEvent<'_>),
    {
        let mut summary = ConversionSummary::default();

        for (index, source) in sources.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                info!("收到中斷訊號，停止轉檔");
                summary.not_processed = sources.len() - index;
                break;
            }

            if !self.target_path(source).exists() {
                on_event(source, ConversionEvent::Started);
            }

            let outcome = self.convert_one(source);
            summary.record(&outcome);
            on_event(source, ConversionEvent::Finished(&outcome));
        }

        info!(
            "轉檔完成 - 成功: {}, 跳過: {}, 失敗: {}, 未處理: {}",
            summary.converted, summary.skipped, summary.failed, summary.not_processed
        );

        summary
    }

    /// 刪除已有對應輸出檔的來源檔
    ///
    /// 重新掃描目錄而不沿用先前的清單，確保依據的是目前的檔案系統狀態
    pub fn delete_converted_sources(&self, directory: &Path) -> Result<SourceDeletionReport> {
        let sources = self.find_sources(directory)?;
        let mut report = SourceDeletionReport::default();
        let mut deleted_names: HashSet<OsString> = HashSet::new();

        for source in sources {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                info!("收到中斷訊號，停止刪除");
                break;
            }

            let Some(name) = source.file_name().map(OsString::from) else {
                continue;
            };
            if deleted_names.contains(&name) {
                continue;
            }

            if !self.target_path(&source).exists() {
                debug!("沒有對應輸出檔，保留: {}", source.display());
                report.kept_without_target.push(source);
                continue;
            }

            let removed_before = report.removal.removed_count();
            report.removal.remove(&source);
            if report.removal.removed_count() > removed_before {
                deleted_names.insert(name);
            }
        }

        info!(
            "刪除原檔完成 - 刪除: {}, 保留: {}, 失敗: {}",
            report.removal.removed_count(),
            report.kept_without_target.len(),
            report.removal.failed_count()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_converter(tool_path: &Path) -> BatchConverter {
        let shutdown_signal = Arc::new(AtomicBool::new(false));
        BatchConverter::new(tool_path, &ConverterSettings::default(), shutdown_signal)
    }

    #[test]
    fn test_find_sources_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("a.heic"), "").unwrap();
        fs::write(base_path.join("b.HEIC"), "").unwrap();
        fs::write(base_path.join("c.jpg"), "").unwrap();
        fs::write(base_path.join("heic"), "").unwrap();
        fs::create_dir(base_path.join("album.heic")).unwrap();

        let converter = create_test_converter(Path::new("magick"));
        let sources = converter.find_sources(base_path).unwrap();

        assert_eq!(
            sources,
            vec![base_path.join("a.heic"), base_path.join("b.HEIC")]
        );
    }

    #[test]
    fn test_custom_extensions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("scan.TIFF"), "").unwrap();
        fs::write(temp_dir.path().join("photo.heic"), "").unwrap();

        let settings = ConverterSettings {
            source_extension: "tiff".to_string(),
            target_extension: "png".to_string(),
            ..ConverterSettings::default()
        };
        let converter =
            BatchConverter::new("magick", &settings, Arc::new(AtomicBool::new(false)));

        let sources = converter.find_sources(temp_dir.path()).unwrap();
        assert_eq!(sources, vec![temp_dir.path().join("scan.TIFF")]);
        assert_eq!(
            converter.target_path(&sources[0]),
            temp_dir.path().join("scan.png")
        );
    }

    #[test]
    fn test_existing_target_is_skipped_without_running_tool() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.heic");
        fs::write(&source, "heic").unwrap();
        fs::write(temp_dir.path().join("a.jpg"), "jpg").unwrap();

        // 工具路徑不存在：若真的被呼叫會得到 Failed
        let converter = create_test_converter(&temp_dir.path().join("no-such-tool"));
        assert_eq!(converter.convert_one(&source), ConversionOutcome::Skipped);
    }

    #[test]
    fn test_missing_tool_is_per_file_failure() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.heic"), "").unwrap();
        fs::write(temp_dir.path().join("b.heic"), "").unwrap();

        let converter = create_test_converter(&temp_dir.path().join("no-such-tool"));
        let sources = converter.find_sources(temp_dir.path()).unwrap();

        let mut seen = Vec::new();
        let summary = converter.convert_all(&sources, |path, event| {
            if let ConversionEvent::Finished(outcome) = event {
                seen.push((path.to_path_buf(), outcome.clone()));
            }
        });

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.succeeded(), 0);
        assert_eq!(seen.len(), 2);
        assert!(
            seen.iter()
                .all(|(_, outcome)| matches!(outcome, ConversionOutcome::Failed(_)))
        );
    }

    #[test]
    fn test_started_event_precedes_each_tool_call() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.heic"), "").unwrap();
        fs::write(base_path.join("a.jpg"), "").unwrap();
        fs::write(base_path.join("b.heic"), "").unwrap();

        let converter = create_test_converter(&base_path.join("no-such-tool"));
        let sources = converter.find_sources(base_path).unwrap();

        let mut events = Vec::new();
        converter.convert_all(&sources, |path, event| {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            let label = match event {
                ConversionEvent::Started => "started",
                ConversionEvent::Finished(ConversionOutcome::Skipped) => "skipped",
                ConversionEvent::Finished(_) => "finished",
            };
            events.push(format!("{name}:{label}"));
        });

        // 已有輸出檔的 a.heic 不會觸發 Started
        assert_eq!(events, vec!["a.heic:skipped", "b.heic:started", "b.heic:finished"]);
    }

    #[test]
    fn test_shutdown_stops_batch() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.heic"), "").unwrap();
        fs::write(temp_dir.path().join("b.heic"), "").unwrap();

        let shutdown_signal = Arc::new(AtomicBool::new(true));
        let converter = BatchConverter::new(
            temp_dir.path().join("no-such-tool"),
            &ConverterSettings::default(),
            shutdown_signal,
        );
        let sources = converter.find_sources(temp_dir.path()).unwrap();

        let mut calls = 0;
        let summary = converter.convert_all(&sources, |_, _| calls += 1);

        assert_eq!(calls, 0);
        assert_eq!(summary.not_processed, 2);
        assert_eq!(summary.succeeded() + summary.failed, 0);
    }

    #[test]
    fn test_delete_only_sources_with_target() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("a.heic"), "").unwrap();
        fs::write(base_path.join("a.jpg"), "").unwrap();
        fs::write(base_path.join("b.HEIC"), "").unwrap();
        fs::write(base_path.join("b.jpg"), "").unwrap();
        fs::write(base_path.join("c.heic"), "").unwrap();

        let converter = create_test_converter(Path::new("magick"));
        let report = converter.delete_converted_sources(base_path).unwrap();

        assert_eq!(report.removal.removed_count(), 2);
        assert_eq!(report.removal.failed_count(), 0);
        assert_eq!(report.kept_without_target, vec![base_path.join("c.heic")]);

        assert!(!base_path.join("a.heic").exists());
        assert!(!base_path.join("b.HEIC").exists());
        assert!(base_path.join("c.heic").exists());
        assert!(base_path.join("a.jpg").exists());
        assert!(base_path.join("b.jpg").exists());
    }

    #[test]
    fn test_delete_rescans_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("a.heic"), "").unwrap();
        let converter = create_test_converter(Path::new("magick"));
        let sources = converter.find_sources(base_path).unwrap();
        assert_eq!(sources.len(), 1);

        // 掃描後才出現的檔案也要依目前狀態處理
        fs::write(base_path.join("late.heic"), "").unwrap();
        fs::write(base_path.join("late.jpg"), "").unwrap();
        fs::remove_file(base_path.join("a.heic")).unwrap();

        let report = converter.delete_converted_sources(base_path).unwrap();
        assert_eq!(report.removal.removed, vec![base_path.join("late.heic")]);
        assert_eq!(report.removal.failed_count(), 0);
        assert!(report.kept_without_target.is_empty());
    }

    #[test]
    fn test_summary_succeeded_counts_skipped() {
        let summary = ConversionSummary {
            converted: 2,
            skipped: 1,
            failed: 3,
            not_processed: 0,
        };
        assert_eq!(summary.succeeded(), 3);
    }
}

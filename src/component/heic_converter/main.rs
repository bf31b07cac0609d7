use super::batch::{
    BatchConverter, ConversionEvent, ConversionOutcome, ConversionSummary, SourceDeletionReport,
};
use super::tool_locator::{ToolLocator, install_guidance, platform_locator};
use crate::config::Config;
use crate::tools::{ConsolePrompt, UserPrompt, display_name};
use anyhow::{Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 一次執行的結果，供呼叫端或測試檢查
#[derive(Debug, Default)]
pub struct ConverterReport {
    pub tool_path: PathBuf,
    pub sources_found: usize,
    pub summary: ConversionSummary,
    /// 使用者同意刪除時才會有值
    pub deletion: Option<SourceDeletionReport>,
}

/// HEIC 轉 JPG 元件
pub struct HeicConverter {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    directory: PathBuf,
    locator: Box<dyn ToolLocator>,
    prompt: Box<dyn UserPrompt>,
}

impl HeicConverter {
    #[must_use]
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        let locator = platform_locator(&config.converter);
        Self {
            config,
            shutdown_signal,
            directory: PathBuf::from("."),
            locator: Box::new(locator),
            prompt: Box::new(ConsolePrompt),
        }
    }

    /// 設定要處理的資料夾（預設為目前工作目錄）
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    #[must_use]
    pub fn with_locator(mut self, locator: impl ToolLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl UserPrompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    pub fn run(&self) -> Result<ConverterReport> {
        println!("{}", style("HEIC to JPG Converter").cyan().bold());
        println!("--------------------");

        let Some(tool_path) = self.locator.locate() else {
            self.print_install_guidance();
            bail!("ImageMagick not found");
        };
        println!("Found ImageMagick at: {}\n", tool_path.display());
        info!("使用 ImageMagick: {}", tool_path.display());

        let converter = BatchConverter::new(
            &tool_path,
            &self.config.converter,
            Arc::clone(&self.shutdown_signal),
        );

        let mut report = ConverterReport {
            tool_path,
            ..ConverterReport::default()
        };

        let sources = converter.find_sources(&self.directory)?;
        report.sources_found = sources.len();

        if sources.is_empty() {
            println!(
                "{}",
                style("No HEIC files found in the current directory.").yellow()
            );
            return Ok(report);
        }

        println!("Found {} HEIC files to process.", sources.len());

        report.summary = self.convert_with_progress(&converter, &sources);
        self.print_summary(&report.summary);

        if report.summary.succeeded() == 0 {
            return Ok(report);
        }

        println!();
        if !self
            .prompt
            .confirm("Do you want to delete the original HEIC files? (yes/no)")?
        {
            println!("\n{}", style("Original HEIC files have been kept.").yellow());
            return Ok(report);
        }

        let deletion = converter.delete_converted_sources(&self.directory)?;
        self.print_deletion(&deletion);
        report.deletion = Some(deletion);

        Ok(report)
    }

    fn convert_with_progress(
        &self,
        converter: &BatchConverter,
        sources: &[PathBuf],
    ) -> ConversionSummary {
        let progress_bar = ProgressBar::new(sources.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let summary = converter.convert_all(sources, |source, event| {
            let name = display_name(source);
            // 進度條隱藏時 println 不會輸出，改用 suspend 確保訊息一定顯示
            progress_bar.suspend(|| match event {
                ConversionEvent::Started => println!("Converting {name}..."),
                ConversionEvent::Finished(ConversionOutcome::Converted) => {
                    println!("Successfully converted {name}");
                }
                ConversionEvent::Finished(ConversionOutcome::Skipped) => {
                    println!("Skipping {name} - JPG already exists");
                }
                ConversionEvent::Finished(ConversionOutcome::Failed(message)) => {
                    println!("{} {name}: {message}", style("Error converting").red());
                }
            });
            if matches!(event, ConversionEvent::Finished(_)) {
                progress_bar.inc(1);
            }
        });

        if summary.not_processed > 0 {
            progress_bar.abandon_with_message("interrupted");
        } else {
            progress_bar.finish_and_clear();
        }

        summary
    }

    fn print_install_guidance(&self) {
        println!(
            "{}",
            style("ImageMagick not found! Please install ImageMagick:")
                .red()
                .bold()
        );
        println!();
        for line in install_guidance() {
            println!("{line}");
        }
    }

    fn print_summary(&self, summary: &ConversionSummary) {
        println!();
        println!("{}", style("Conversion complete!").cyan().bold());
        println!(
            "Successfully converted: {}",
            style(summary.succeeded()).green()
        );
        if summary.skipped > 0 {
            println!(
                "  (already converted earlier: {})",
                style(summary.skipped).dim()
            );
        }
        if summary.failed > 0 {
            println!("Failed conversions: {}", style(summary.failed).red());
        }
        if summary.not_processed > 0 {
            println!(
                "Not processed (interrupted): {}",
                style(summary.not_processed).yellow()
            );
        }
    }

    fn print_deletion(&self, deletion: &SourceDeletionReport) {
        for path in &deletion.removal.removed {
            println!("Deleted: {}", display_name(path));
        }
        for (path, error) in &deletion.removal.failed {
            println!(
                "{} {}: {error}",
                style("Error deleting").red(),
                display_name(path)
            );
        }
        if !deletion.kept_without_target.is_empty() {
            println!(
                "Kept {} HEIC files without a converted JPG.",
                style(deletion.kept_without_target.len()).yellow()
            );
        }

        println!(
            "\n{}",
            style(format!(
                "Successfully deleted {} HEIC files.",
                deletion.removal.removed_count()
            ))
            .green()
        );
    }
}

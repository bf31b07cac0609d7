use super::duplicate_finder::DuplicateFinder;
use crate::tools::{ConsolePrompt, RemovalReport, UserPrompt, display_name};
use anyhow::Result;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 一次執行的結果
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub duplicates_found: Vec<PathBuf>,
    /// 使用者同意刪除時才會有值
    pub removal: Option<RemovalReport>,
}

/// 重複檔清理元件
pub struct DuplicateCleaner {
    shutdown_signal: Arc<AtomicBool>,
    directory: PathBuf,
    prompt: Box<dyn UserPrompt>,
}

impl DuplicateCleaner {
    #[must_use]
    pub fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            shutdown_signal,
            directory: PathBuf::from("."),
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
    pub fn with_prompt(mut self, prompt: impl UserPrompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    pub fn run(&self) -> Result<CleanupReport> {
        let finder = DuplicateFinder::new(Arc::clone(&self.shutdown_signal));
        let duplicates = finder.find(&self.directory)?;

        let mut report = CleanupReport {
            duplicates_found: duplicates,
            removal: None,
        };

        if report.duplicates_found.is_empty() {
            println!("{}", style("No duplicate files found.").green());
            return Ok(report);
        }

        self.print_duplicates(&report.duplicates_found);

        println!();
        if !self
            .prompt
            .confirm("Do you want to delete these files? (yes/no)")?
        {
            println!("{}", style("Operation cancelled.").yellow());
            return Ok(report);
        }

        let removal = finder.delete(&report.duplicates_found);
        self.print_result(&removal);
        report.removal = Some(removal);

        Ok(report)
    }

    fn print_duplicates(&self, duplicates: &[PathBuf]) {
        println!();
        println!(
            "{}",
            style("Found the following duplicate files:").yellow()
        );
        for path in duplicates {
            println!("- {}", display_name(path));
        }
    }

    fn print_result(&self, removal: &RemovalReport) {
        for path in &removal.removed {
            println!("Deleted: {}", display_name(path));
        }
        for (path, error) in &removal.failed {
            println!(
                "{} {}: {error}",
                style("Error deleting").red(),
                display_name(path)
            );
        }
        println!("\n{}", style("Deletion complete!").cyan().bold());
    }
}

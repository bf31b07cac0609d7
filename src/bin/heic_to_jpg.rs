use anyhow::Result;
use console::style;
use heic_tidy::component::HeicConverter;
use heic_tidy::config::Config;
use heic_tidy::init;
use heic_tidy::signal::setup_shutdown_signal;
use log::{info, warn};
use std::process::ExitCode;

fn main() -> ExitCode {
    init::init();

    match run() {
        Ok(()) => {
            info!("Program exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!("Program error: {e:#}");
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let shutdown_signal = setup_shutdown_signal()?;
    let config = Config::new();

    // 個別檔案失敗只會回報，不影響結束碼
    HeicConverter::new(config, shutdown_signal).run()?;
    Ok(())
}

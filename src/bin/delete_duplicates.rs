use anyhow::Result;
use console::style;
use heic_tidy::component::DuplicateCleaner;
use heic_tidy::init;
use heic_tidy::signal::setup_shutdown_signal;
use log::{info, warn};

fn main() {
    init::init();

    // 無論結果如何都以 0 結束，錯誤只顯示給使用者
    match run() {
        Ok(()) => info!("Program exited normally"),
        Err(e) => {
            warn!("Program error: {e:#}");
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
        }
    }
}

fn run() -> Result<()> {
    let shutdown_signal = setup_shutdown_signal()?;
    DuplicateCleaner::new(shutdown_signal).run()?;
    Ok(())
}

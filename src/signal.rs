use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 第二次中斷時使用的結束碼（128 + SIGINT）
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// 設定 Ctrl-C 處理器
///
/// 第一次中斷只設定旗標，讓批次處理在檔案之間安全停止；
/// 第二次中斷直接結束程式，避免卡在等待輸入的提示上
pub fn setup_shutdown_signal() -> Result<Arc<AtomicBool>> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        if signal_clone.swap(true, Ordering::SeqCst) {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        eprintln!("\nInterrupt received, stopping after the current file...");
    })
    .context("無法設定 Ctrl-C 處理器")?;

    Ok(shutdown_signal)
}

//! 重複檔清理元件
//!
//! 找出目前資料夾中檔名帶有 `(數字)` 編號的重複檔，確認後一次刪除

mod duplicate_finder;
mod main;

pub use duplicate_finder::{DuplicateFinder, is_numbered_duplicate};
pub use main::{CleanupReport, DuplicateCleaner};

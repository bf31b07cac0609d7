//! 功能元件模組
//!
//! 每個子模組實現一個獨立的工具，包含主要邏輯和專用工具

pub mod duplicate_cleaner;
pub mod heic_converter;

pub use duplicate_cleaner::DuplicateCleaner;
pub use heic_converter::HeicConverter;

//! HEIC 轉 JPG 元件
//!
//! 偵測本機安裝的 ImageMagick，逐一轉換目前資料夾中的 HEIC 檔，
//! 並可在確認後刪除已有對應 JPG 的原檔

mod batch;
mod magick_command;
mod main;
mod tool_locator;

pub use batch::{
    BatchConverter, ConversionEvent, ConversionOutcome, ConversionSummary, SourceDeletionReport,
};
pub use magick_command::MagickCommand;
pub use main::{ConverterReport, HeicConverter};
pub use tool_locator::{
    CandidateLocator, ConfiguredLocator, IMAGEMAGICK_DIR_PREFIX, IMAGEMAGICK_REGISTRY_KEY,
    LocatorChain, MAGICK_PROGRAM, PathSearchLocator, ProgramFilesLocator, RegistryLocator,
    ToolLocator, UNIX_CANDIDATE_PATHS, WINDOWS_EXECUTABLE, install_guidance, platform_locator,
};

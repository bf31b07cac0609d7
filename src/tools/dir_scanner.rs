use crate::tools::validate_directory_exists;
use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 列出目錄第一層的一般檔案（不遞迴），依檔名排序
///
/// 每次呼叫都重新讀取檔案系統，不保留快取
pub fn list_files(directory: &Path) -> Result<Vec<PathBuf>> {
    validate_directory_exists(directory)?;

    let files = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("讀取目錄項目失敗: {e}");
                None
            }
        })
        .filter(is_listed_file)
        .map(walkdir::DirEntry::into_path)
        .collect();

    Ok(files)
}

/// 一般檔案，或不指向資料夾的符號連結（含目標已不存在的連結）
fn is_listed_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

/// 列出目錄第一層中符合條件的一般檔案
pub fn list_files_matching<F>(directory: &Path, predicate: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    Ok(list_files(directory)?
        .into_iter()
        .filter(|path| predicate(path.as_path()))
        .collect())
}

use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("Path is not a directory: {}", path.display());
    }
    Ok(())
}

/// 檢查副檔名是否相符（不分大小寫，`ext` 不含前導點）
#[must_use]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// 取得顯示用的檔名
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_directory_exists(temp_dir.path()).is_ok());

        let missing = temp_dir.path().join("missing");
        assert!(validate_directory_exists(&missing).is_err());

        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(validate_directory_exists(&file).is_err());
    }

    #[test]
    fn test_has_extension_ignores_case() {
        assert!(has_extension(Path::new("a.heic"), "heic"));
        assert!(has_extension(Path::new("b.HEIC"), "heic"));
        assert!(has_extension(Path::new("c.HeIc"), "HEIC"));
        assert!(!has_extension(Path::new("c.jpg"), "heic"));
        assert!(!has_extension(Path::new("heic"), "heic"));
        assert!(!has_extension(Path::new("a.heic.bak"), "heic"));
    }
}

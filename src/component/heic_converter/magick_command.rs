use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 單一檔案的 ImageMagick 轉檔指令：`magick <來源> <輸出>`
pub struct MagickCommand {
    tool_path: PathBuf,
    source_path: PathBuf,
    destination_path: PathBuf,
}

impl MagickCommand {
    #[must_use]
    pub fn new(tool_path: &Path, source_path: &Path, target_extension: &str) -> Self {
        Self {
            tool_path: tool_path.to_path_buf(),
            source_path: source_path.to_path_buf(),
            destination_path: Self::generate_destination_path(source_path, target_extension),
        }
    }

    /// 將副檔名換成輸出格式，其餘部分（含多重點號）保持不變
    #[must_use]
    pub fn generate_destination_path(source_path: &Path, target_extension: &str) -> PathBuf {
        source_path.with_extension(target_extension)
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// 建立指令，路徑一律轉為絕對路徑，stdout/stderr 交由呼叫端擷取
    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.tool_path);

        cmd.arg(absolute_or_original(&self.source_path))
            .arg(absolute_or_original(&self.destination_path))
            .stdin(Stdio::null());

        cmd
    }
}

fn absolute_or_original(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_destination_path() {
        let cmd = MagickCommand::new(
            Path::new("/usr/bin/magick"),
            Path::new("/photos/IMG_0001.HEIC"),
            "jpg",
        );
        assert_eq!(cmd.destination_path(), Path::new("/photos/IMG_0001.jpg"));
    }

    #[test]
    fn test_generate_destination_path_with_dots() {
        assert_eq!(
            MagickCommand::generate_destination_path(Path::new("/photos/trip.day1.heic"), "jpg"),
            Path::new("/photos/trip.day1.jpg")
        );
    }

    #[test]
    fn test_build_command_uses_absolute_paths() {
        let cmd = MagickCommand::new(Path::new("magick"), Path::new("a.heic"), "jpg");
        let command = cmd.build_command();

        assert_eq!(command.get_program(), "magick");

        let args: Vec<PathBuf> = command.get_args().map(PathBuf::from).collect();
        assert_eq!(args.len(), 2);
        assert!(args.iter().all(|arg| arg.is_absolute()));
        assert!(args[0].ends_with("a.heic"));
        assert!(args[1].ends_with("a.jpg"));
    }
}

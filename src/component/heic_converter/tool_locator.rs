//! ImageMagick 執行檔偵測
//!
//! 每種偵測方式實作 [`ToolLocator`]，再由 [`LocatorChain`] 依序嘗試，第一個找到的即為結果。
//! 平台相關的策略只在 [`platform_locator`] 中依編譯目標組合。

use crate::config::ConverterSettings;
use log::{debug, warn};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// ImageMagick 7 的指令名稱
pub const MAGICK_PROGRAM: &str = "magick";

/// Windows 安裝程式寫入的登錄機碼
pub const IMAGEMAGICK_REGISTRY_KEY: &str = r"HKLM\SOFTWARE\ImageMagick\Current";

/// Windows 安裝目錄名稱前綴（例如 `ImageMagick-7.1.1-Q16-HDRI`）
pub const IMAGEMAGICK_DIR_PREFIX: &str = "ImageMagick";

pub const WINDOWS_EXECUTABLE: &str = "magick.exe";

/// 類 Unix 系統上常見的安裝位置
pub const UNIX_CANDIDATE_PATHS: [&str; 3] = [
    "/usr/bin/magick",
    "/usr/local/bin/magick",
    "/opt/homebrew/bin/magick",
];

pub trait ToolLocator {
    /// 策略名稱，用於日誌
    fn name(&self) -> &str;

    /// 回傳找到的執行檔路徑，找不到時回傳 `None`
    fn locate(&self) -> Option<PathBuf>;
}

/// 依序嘗試多個策略，第一個成功者勝出
#[derive(Default)]
pub struct LocatorChain {
    strategies: Vec<Box<dyn ToolLocator>>,
}

impl LocatorChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, strategy: impl ToolLocator + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl ToolLocator for LocatorChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn locate(&self) -> Option<PathBuf> {
        self.strategies.iter().find_map(|strategy| {
            let found = strategy.locate();
            match &found {
                Some(path) => debug!("{} 找到執行檔: {}", strategy.name(), path.display()),
                None => debug!("{} 未找到執行檔", strategy.name()),
            }
            found
        })
    }
}

/// 設定檔中手動指定的路徑
pub struct ConfiguredLocator {
    path: PathBuf,
}

impl ConfiguredLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ToolLocator for ConfiguredLocator {
    fn name(&self) -> &str {
        "settings"
    }

    fn locate(&self) -> Option<PathBuf> {
        if self.path.is_file() {
            Some(self.path.clone())
        } else {
            warn!(
                "設定的 magick_path 不存在，改用自動偵測: {}",
                self.path.display()
            );
            None
        }
    }
}

/// 依序檢查固定的候選路徑
pub struct CandidateLocator {
    candidates: Vec<PathBuf>,
}

impl CandidateLocator {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

impl ToolLocator for CandidateLocator {
    fn name(&self) -> &str {
        "candidate paths"
    }

    fn locate(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|path| path.is_file()).cloned()
    }
}

/// 在 `PATH` 環境變數列出的目錄中尋找指令
pub struct PathSearchLocator {
    program: String,
    search_path: Option<OsString>,
}

impl PathSearchLocator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            search_path: None,
        }
    }

    /// 使用指定的搜尋路徑取代 `PATH`
    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }
}

impl ToolLocator for PathSearchLocator {
    fn name(&self) -> &str {
        "PATH search"
    }

    fn locate(&self) -> Option<PathBuf> {
        let search_path = self
            .search_path
            .clone()
            .or_else(|| env::var_os("PATH"))?;
        let file_name = format!("{}{}", self.program, env::consts::EXE_SUFFIX);

        env::split_paths(&search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
    }
}

/// 查詢 Windows 登錄中的安裝目錄
///
/// 透過系統的 `reg query` 指令讀取，其他平台上指令不存在時自然回傳 `None`
pub struct RegistryLocator {
    key: String,
    executable: String,
}

impl RegistryLocator {
    pub fn new(key: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            executable: executable.into(),
        }
    }
}

impl ToolLocator for RegistryLocator {
    fn name(&self) -> &str {
        "registry"
    }

    fn locate(&self) -> Option<PathBuf> {
        let output = Command::new("reg")
            .args(["query", self.key.as_str(), "/ve"])
            .stdin(Stdio::null())
            .output()
            .ok()?;

        if !output.status.success() {
            debug!("登錄機碼不存在: {}", self.key);
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let install_dir = parse_reg_query_value(&stdout)?;
        let executable = Path::new(&install_dir).join(&self.executable);

        executable.is_file().then_some(executable)
    }
}

/// 從 `reg query` 輸出取出 REG_SZ 值
///
/// 輸出格式類似：
/// `    (Default)    REG_SZ    C:\Program Files\ImageMagick-7.1.1-Q16-HDRI`
fn parse_reg_query_value(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (_, value) = line.split_once("REG_SZ")?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// 掃描 Program Files 底下以 `ImageMagick` 開頭的安裝目錄
pub struct ProgramFilesLocator {
    roots: Vec<PathBuf>,
    dir_prefix: String,
    executable: String,
}

impl ProgramFilesLocator {
    pub fn new<I, P>(
        roots: I,
        dir_prefix: impl Into<String>,
        executable: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            dir_prefix: dir_prefix.into(),
            executable: executable.into(),
        }
    }

    /// 由 `ProgramFiles` / `ProgramFiles(x86)` 環境變數決定搜尋根目錄
    #[must_use]
    pub fn from_env() -> Self {
        let roots = [
            ("ProgramFiles", r"C:\Program Files"),
            ("ProgramFiles(x86)", r"C:\Program Files (x86)"),
        ]
        .into_iter()
        .map(|(var, fallback)| {
            env::var_os(var).map_or_else(|| PathBuf::from(fallback), PathBuf::from)
        });

        Self::new(roots, IMAGEMAGICK_DIR_PREFIX, WINDOWS_EXECUTABLE)
    }

    fn search_root(&self, root: &Path) -> Option<PathBuf> {
        let entries = fs::read_dir(root).ok()?;

        let mut install_dirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(&self.dir_prefix)
            })
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();

        // 版本號較新的目錄名稱排序較後，優先嘗試
        install_dirs.sort_unstable_by(|a, b| b.cmp(a));

        install_dirs
            .into_iter()
            .map(|dir| dir.join(&self.executable))
            .find(|path| path.is_file())
    }
}

impl ToolLocator for ProgramFilesLocator {
    fn name(&self) -> &str {
        "Program Files"
    }

    fn locate(&self) -> Option<PathBuf> {
        self.roots.iter().find_map(|root| self.search_root(root))
    }
}

/// 組合目前平台的偵測策略
#[must_use]
pub fn platform_locator(settings: &ConverterSettings) -> LocatorChain {
    let chain = match &settings.magick_path {
        Some(path) => LocatorChain::new().with(ConfiguredLocator::new(path)),
        None => LocatorChain::new(),
    };
    with_platform_strategies(chain)
}

#[cfg(windows)]
fn with_platform_strategies(chain: LocatorChain) -> LocatorChain {
    chain
        .with(RegistryLocator::new(
            IMAGEMAGICK_REGISTRY_KEY,
            WINDOWS_EXECUTABLE,
        ))
        .with(ProgramFilesLocator::from_env())
}

#[cfg(not(windows))]
fn with_platform_strategies(chain: LocatorChain) -> LocatorChain {
    chain
        .with(CandidateLocator::new(UNIX_CANDIDATE_PATHS))
        .with(PathSearchLocator::new(MAGICK_PROGRAM))
}

/// 找不到 ImageMagick 時顯示的安裝說明
#[cfg(windows)]
#[must_use]
pub fn install_guidance() -> &'static [&'static str] {
    &[
        "1. Visit: https://imagemagick.org/script/download.php",
        "2. Download and install the Windows version",
        "3. Run this program again",
    ]
}

/// 找不到 ImageMagick 時顯示的安裝說明
#[cfg(not(windows))]
#[must_use]
pub fn install_guidance() -> &'static [&'static str] {
    &[
        "Install using your package manager:",
        "- macOS (Homebrew): brew install imagemagick",
        "- Ubuntu/Debian: sudo apt-get install imagemagick",
        "- Fedora: sudo dnf install imagemagick",
    ]
}

use std::ffi::OsStr;

use crate::adapters::system::command;
use crate::core::errors::{BootstrapError, Result};
use crate::core::traits::fetcher::KeyFetcher;

/// External download utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadTool {
    Curl,
    Wget,
}

impl DownloadTool {
    pub fn binary(&self) -> &'static str {
        match self {
            DownloadTool::Curl => "curl",
            DownloadTool::Wget => "wget",
        }
    }

    /// Arguments that write `url` to `dest`, failing on HTTP errors.
    fn args<'a>(&self, url: &'a str, dest: &'a OsStr) -> Vec<&'a OsStr> {
        match self {
            DownloadTool::Curl => vec![
                OsStr::new("-fsSL"),
                OsStr::new("-o"),
                dest,
                OsStr::new(url),
            ],
            DownloadTool::Wget => vec![OsStr::new("-q"), OsStr::new("-O"), dest, OsStr::new(url)],
        }
    }

    /// First installed tool, curl preferred.
    pub fn detect() -> Option<Self> {
        [DownloadTool::Curl, DownloadTool::Wget]
            .into_iter()
            .find(|t| command::is_available(t.binary()))
    }
}

/// Downloads keys by shelling out to curl or wget.
///
/// The body lands in a temporary file that is removed when this call
/// returns, whether the download succeeded or not.
pub struct CommandFetcher {
    tool: DownloadTool,
}

impl CommandFetcher {
    pub fn new(tool: DownloadTool) -> Self {
        Self { tool }
    }

    /// Use `tool`, failing with `ToolMissing` if it is not installed.
    pub fn require(tool: DownloadTool) -> Result<Self> {
        if !command::is_available(tool.binary()) {
            return Err(BootstrapError::ToolMissing {
                tool: tool.binary().into(),
            });
        }
        Ok(Self::new(tool))
    }

    /// Use whichever of curl or wget is installed.
    pub fn detect() -> Result<Self> {
        DownloadTool::detect()
            .map(Self::new)
            .ok_or_else(|| BootstrapError::ToolMissing {
                tool: "curl or wget".into(),
            })
    }
}

impl KeyFetcher for CommandFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let tmp = tempfile::NamedTempFile::new()?;
        command::run(self.tool.binary(), &self.tool.args(url, tmp.path().as_os_str()))?;
        let body = std::fs::read(tmp.path())?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn name(&self) -> &str {
        self.tool.binary()
    }
}

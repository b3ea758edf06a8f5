use anyhow::{Result, anyhow};
use std::fmt;

use super::Tables;
use super::labels;

/// A target platform expressed in canonical labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the current platform
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: Self::detect_arch(),
        }
    }

    fn detect_os() -> String {
        #[cfg(target_os = "macos")]
        {
            labels::OS_DARWIN.to_string()
        }
        #[cfg(target_os = "linux")]
        {
            labels::OS_LINUX.to_string()
        }
        #[cfg(target_os = "windows")]
        {
            labels::OS_WINDOWS.to_string()
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            std::env::consts::OS.to_string()
        }
    }

    fn detect_arch() -> String {
        #[cfg(target_arch = "x86_64")]
        {
            labels::ARCH_X86_64.to_string()
        }
        #[cfg(target_arch = "aarch64")]
        {
            labels::ARCH_ARM64.to_string()
        }
        #[cfg(target_arch = "x86")]
        {
            labels::ARCH_386.to_string()
        }
        #[cfg(target_arch = "arm")]
        {
            labels::ARCH_ARM.to_string()
        }
        #[cfg(not(any(
            target_arch = "x86_64",
            target_arch = "aarch64",
            target_arch = "x86",
            target_arch = "arm"
        )))]
        {
            std::env::consts::ARCH.to_string()
        }
    }

    /// Parses an `os/arch` slug, resolving both halves to canonical labels.
    pub fn parse_slug(tables: &Tables, slug: &str) -> Result<Self> {
        let (os, arch) = slug.split_once('/').unwrap_or((slug, ""));
        let os = tables
            .resolve_os(os)
            .ok_or_else(|| anyhow!("invalid OS in platform slug: {:?}", slug))?;
        let arch = tables
            .resolve_arch(arch)
            .ok_or_else(|| anyhow!("invalid arch in platform slug: {:?}", slug))?;
        Ok(Self::new(os, arch))
    }

    /// Maps both fields through the tables, keeping unknown labels as given.
    pub fn canonical(&self, tables: &Tables) -> Self {
        Self {
            os: tables
                .resolve_os(&self.os)
                .map(str::to_string)
                .unwrap_or_else(|| self.os.to_lowercase()),
            arch: tables
                .resolve_arch(&self.arch)
                .map(str::to_string)
                .unwrap_or_else(|| self.arch.to_lowercase()),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == labels::OS_WINDOWS
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detect() {
        let platform = Platform::detect();

        assert!(!platform.os.is_empty());
        assert!(!platform.arch.is_empty());

        #[cfg(target_os = "macos")]
        assert_eq!(platform.os, "darwin");

        #[cfg(target_os = "linux")]
        assert_eq!(platform.os, "linux");

        #[cfg(target_os = "windows")]
        assert_eq!(platform.os, "windows");

        #[cfg(target_arch = "x86_64")]
        assert_eq!(platform.arch, "x86_64");

        #[cfg(target_arch = "aarch64")]
        assert_eq!(platform.arch, "arm64");
    }

    #[test]
    fn test_detected_platform_is_canonical() {
        let tables = Tables::builtin().unwrap();
        let platform = Platform::detect();
        assert_eq!(platform.canonical(&tables), platform);
    }

    #[test]
    fn test_parse_slug() {
        let tables = Tables::builtin().unwrap();

        let p = Platform::parse_slug(&tables, "linux/amd64").unwrap();
        assert_eq!(p, Platform::new("linux", "x86_64"));

        let p = Platform::parse_slug(&tables, "macos/aarch64").unwrap();
        assert_eq!(p, Platform::new("darwin", "arm64"));
        assert_eq!(p.to_string(), "darwin/arm64");
    }

    #[test]
    fn test_parse_slug_invalid() {
        let tables = Tables::builtin().unwrap();

        let err = Platform::parse_slug(&tables, "plan9/amd64").unwrap_err();
        assert!(err.to_string().contains("invalid OS"));

        let err = Platform::parse_slug(&tables, "linux/mips").unwrap_err();
        assert!(err.to_string().contains("invalid arch"));

        assert!(Platform::parse_slug(&tables, "linux").is_err());
    }

    #[test]
    fn test_canonical_keeps_unknown_labels() {
        let tables = Tables::builtin().unwrap();
        let p = Platform::new("Windows", "X64").canonical(&tables);
        assert_eq!(p, Platform::new("windows", "x86_64"));
        assert!(p.is_windows());

        let p = Platform::new("haiku", "MIPS").canonical(&tables);
        assert_eq!(p, Platform::new("haiku", "mips"));
    }
}

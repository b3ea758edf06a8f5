//! Operating system families and their native package formats.

use log::debug;
use std::fmt;
use std::path::Path;

use crate::runtime::Runtime;

use super::extension::{PACKAGE_APK, PACKAGE_DEB, PACKAGE_DMG, PACKAGE_MSI, PACKAGE_RPM};

const OS_RELEASE_PATH: &str = "/etc/os-release";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Alpine,
    Alma,
    Arch,
    Fedora,
    Debian,
    Distroless,
    Rocky,
    Rhel,
    Ubuntu,
    Wolfi,
    MacOs,
    Windows,
}

impl OsFamily {
    /// The package format installed natively on this family, if any.
    pub fn preferred_package(&self) -> Option<&'static str> {
        match self {
            OsFamily::Alpine | OsFamily::Wolfi => Some(PACKAGE_APK),
            OsFamily::Debian | OsFamily::Ubuntu => Some(PACKAGE_DEB),
            OsFamily::Alma
            | OsFamily::Arch
            | OsFamily::Fedora
            | OsFamily::Rocky
            | OsFamily::Rhel => Some(PACKAGE_RPM),
            OsFamily::MacOs => Some(PACKAGE_DMG),
            OsFamily::Windows => Some(PACKAGE_MSI),
            OsFamily::Distroless => None,
        }
    }

    fn from_os_release_id(id: &str) -> Option<Self> {
        match id {
            "alpine" => Some(OsFamily::Alpine),
            "almalinux" => Some(OsFamily::Alma),
            "arch" => Some(OsFamily::Arch),
            "fedora" => Some(OsFamily::Fedora),
            "debian" => Some(OsFamily::Debian),
            "distroless" => Some(OsFamily::Distroless),
            "rocky" => Some(OsFamily::Rocky),
            "rhel" => Some(OsFamily::Rhel),
            "ubuntu" => Some(OsFamily::Ubuntu),
            "wolfi" => Some(OsFamily::Wolfi),
            _ => None,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Alpine => "alpine",
            OsFamily::Alma => "almalinux",
            OsFamily::Arch => "arch",
            OsFamily::Fedora => "fedora",
            OsFamily::Debian => "debian",
            OsFamily::Distroless => "distroless",
            OsFamily::Rocky => "rocky",
            OsFamily::Rhel => "rhel",
            OsFamily::Ubuntu => "ubuntu",
            OsFamily::Wolfi => "wolfi",
            OsFamily::MacOs => "macos",
            OsFamily::Windows => "windows",
        };
        write!(f, "{}", name)
    }
}

/// Reads the `ID` key of an os-release file.
pub fn parse_os_release(content: &str) -> Option<OsFamily> {
    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key != "ID" {
            continue;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        let family = OsFamily::from_os_release_id(value);
        if family.is_none() {
            debug!("unknown os-release ID {:?}", value);
        }
        return family;
    }
    None
}

/// Detects the family of the running system.
#[tracing::instrument(skip(runtime))]
pub fn detect_os_family<R: Runtime>(runtime: &R) -> Option<OsFamily> {
    if cfg!(windows) {
        return Some(OsFamily::Windows);
    }
    if cfg!(target_os = "macos") {
        return Some(OsFamily::MacOs);
    }

    match runtime.read_to_string(Path::new(OS_RELEASE_PATH)) {
        Ok(content) => parse_os_release(&content),
        Err(e) => {
            debug!("could not read {}: {}", OS_RELEASE_PATH, e);
            None
        }
    }
}

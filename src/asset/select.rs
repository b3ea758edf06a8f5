//! Chooses the release file to download for a platform.

use anyhow::{Result, bail};
use log::debug;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::system::labels::OS_WINDOWS;
use crate::system::{OsFamily, Platform, Tables};

use super::model::{Asset, Installable, ReleaseItem};

/// Suffixes of files published next to the real payloads.
const METADATA_SUFFIXES: &[&str] = &[
    ".sig",
    ".asc",
    ".pem",
    ".crt",
    ".cert",
    ".pub",
    ".sha256",
    ".sha512",
    ".sbom",
    ".sbom.json",
    ".spdx",
    ".spdx.json",
    ".intoto.jsonl",
    ".bundle",
];

/// Kind of file the user wants to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadType {
    Binary,
    Package,
    Archive,
}

impl FromStr for DownloadType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "binary" | "b" => Ok(DownloadType::Binary),
            "package" | "p" => Ok(DownloadType::Package),
            "archive" | "a" => Ok(DownloadType::Archive),
            _ => bail!(
                "invalid download type {:?}, expected binary, package or archive",
                s
            ),
        }
    }
}

impl fmt::Display for DownloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DownloadType::Binary => "binary",
            DownloadType::Package => "package",
            DownloadType::Archive => "archive",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no asset or installable named {0:?} found in the release")]
    NoMatchingName(String),

    #[error("{name:?} has no {} variant for {platform}", kind_label(.kind))]
    NoPlatformVariant {
        name: String,
        platform: Platform,
        kind: Option<DownloadType>,
    },
}

fn kind_label(kind: &Option<DownloadType>) -> String {
    kind.map(|k| k.to_string())
        .unwrap_or_else(|| "installable".to_string())
}

/// What to look for in a release.
#[derive(Debug, Clone)]
pub struct SelectRequest {
    pub name: String,
    pub platform: Platform,
    pub download_type: Option<DownloadType>,
    pub family: Option<OsFamily>,
}

impl SelectRequest {
    pub fn new(name: impl Into<String>, platform: Platform) -> Self {
        Self {
            name: name.into(),
            platform,
            download_type: None,
            family: None,
        }
    }

    pub fn with_download_type(mut self, download_type: Option<DownloadType>) -> Self {
        self.download_type = download_type;
        self
    }

    pub fn with_family(mut self, family: Option<OsFamily>) -> Self {
        self.family = family;
        self
    }
}

/// The chosen asset and the filename it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub asset: Asset,
    pub filename: String,
}

pub struct VariantSelector<'a> {
    tables: &'a Tables,
}

impl<'a> VariantSelector<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Finds the item named in `request` and, for an installable, the
    /// variant that fits the requested platform and download type.
    ///
    /// An installable wins over a standalone asset of the same name.
    pub fn select(
        &self,
        items: &[ReleaseItem],
        request: &SelectRequest,
    ) -> Result<Selection, SelectError> {
        let installable = items.iter().find_map(|item| match item {
            ReleaseItem::Installable(i) if i.name == request.name => Some(i),
            _ => None,
        });
        if let Some(installable) = installable {
            return self.select_variant(installable, request);
        }

        items
            .iter()
            .find_map(|item| match item {
                ReleaseItem::Asset(a) if a.name == request.name => Some(Selection {
                    asset: a.clone(),
                    filename: a.name.clone(),
                }),
                _ => None,
            })
            .ok_or_else(|| SelectError::NoMatchingName(request.name.clone()))
    }

    fn select_variant(
        &self,
        installable: &Installable,
        request: &SelectRequest,
    ) -> Result<Selection, SelectError> {
        let platform = request.platform.canonical(self.tables);
        let native = request.family.and_then(|f| f.preferred_package());

        let candidates: Vec<&Asset> = installable
            .variants
            .iter()
            .filter(|v| v.matches_platform(&platform))
            .filter(|v| match request.download_type {
                Some(DownloadType::Binary) => v.is_binary(),
                Some(DownloadType::Package) => v.is_package(),
                Some(DownloadType::Archive) => v.is_archive(),
                None => true,
            })
            .collect();
        debug!(
            "{} of {} variants of {} fit {}",
            candidates.len(),
            installable.variants.len(),
            installable.name,
            platform
        );

        let chosen = candidates
            .into_iter()
            .min_by_key(|v| rank(v, native))
            .ok_or_else(|| SelectError::NoPlatformVariant {
                name: installable.name.clone(),
                platform: platform.clone(),
                kind: request.download_type,
            })?;

        Ok(Selection {
            asset: chosen.clone(),
            filename: save_filename(installable, chosen),
        })
    }
}

/// Lower ranks are preferred: archives, then packages (native format first),
/// then bare files, with release metadata after real payloads of each class.
fn rank(variant: &Asset, native_package: Option<&str>) -> (u8, u8, u8) {
    let class = if variant.is_archive() {
        0
    } else if variant.is_package() {
        1
    } else {
        2
    };
    let foreign = match (variant.package_type.as_deref(), native_package) {
        (Some(t), Some(native)) if t == native => 0,
        (Some(_), Some(_)) => 1,
        _ => 0,
    };
    let metadata = u8::from(is_release_metadata(&variant.name));
    (class, foreign, metadata)
}

/// Signatures, certificates, checksums, SBOMs and keys.
pub fn is_release_metadata(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.contains("checksum")
        || METADATA_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

fn save_filename(installable: &Installable, variant: &Asset) -> String {
    if !variant.is_binary() {
        return variant.name.clone();
    }
    let mut name = installable.name.clone();
    if variant.os.as_deref() == Some(OS_WINDOWS) {
        name.push_str(".exe");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::aggregate;

    fn asset(name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            version: "v2.4.3".into(),
            download_url: format!("https://example.com/{}", name),
            ..Default::default()
        }
    }

    fn release(tables: &Tables, names: &[&str]) -> Vec<ReleaseItem> {
        aggregate(tables, names.iter().map(|n| asset(n)).collect())
    }

    const COSIGN: &[&str] = &[
        "cosign-linux-amd64",
        "cosign-linux-amd64.sig",
        "cosign-linux-amd64-keyless.pem",
        "cosign-linux-arm64",
        "cosign-darwin-arm64",
        "cosign-windows-amd64.exe",
        "cosign_2.4.3_amd64.deb",
        "cosign-2.4.3-1.x86_64.rpm",
        "cosign_2.4.3_x86_64.apk",
        "cosign_checksums.txt",
    ];

    #[test]
    fn test_download_type_from_str() {
        assert_eq!("binary".parse::<DownloadType>().unwrap(), DownloadType::Binary);
        assert_eq!("b".parse::<DownloadType>().unwrap(), DownloadType::Binary);
        assert_eq!("Package".parse::<DownloadType>().unwrap(), DownloadType::Package);
        assert_eq!("p".parse::<DownloadType>().unwrap(), DownloadType::Package);
        assert_eq!("archive".parse::<DownloadType>().unwrap(), DownloadType::Archive);
        assert_eq!("a".parse::<DownloadType>().unwrap(), DownloadType::Archive);
        assert!("installer".parse::<DownloadType>().is_err());
    }

    #[test]
    fn test_select_bare_binary() {
        // --- Setup ---
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let request = SelectRequest::new("cosign", Platform::new("linux", "amd64"))
            .with_download_type(Some(DownloadType::Binary));

        // --- Execute ---
        let selection = VariantSelector::new(&tables).select(&items, &request).unwrap();

        // --- Verify ---
        assert_eq!(selection.asset.name, "cosign-linux-amd64");
        assert_eq!(selection.filename, "cosign");
    }

    #[test]
    fn test_select_windows_binary_gets_exe() {
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let request = SelectRequest::new("cosign", Platform::new("windows", "x86_64"));

        let selection = VariantSelector::new(&tables).select(&items, &request).unwrap();

        assert_eq!(selection.asset.name, "cosign-windows-amd64.exe");
        assert_eq!(selection.filename, "cosign.exe");
    }

    #[test]
    fn test_select_single_variant() {
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let request = SelectRequest::new("cosign", Platform::new("darwin", "arm64"));

        let selection = VariantSelector::new(&tables).select(&items, &request).unwrap();
        assert_eq!(selection.asset.name, "cosign-darwin-arm64");
        assert_eq!(selection.filename, "cosign");
    }

    #[test]
    fn test_select_prefers_package_over_binary() {
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let request = SelectRequest::new("cosign", Platform::new("linux", "x86_64"));

        let selection = VariantSelector::new(&tables).select(&items, &request).unwrap();
        assert!(selection.asset.is_package());
        // packages keep their filename
        assert_eq!(selection.filename, selection.asset.name);
    }

    #[test]
    fn test_select_native_package() {
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let selector = VariantSelector::new(&tables);

        let cases = [
            (OsFamily::Ubuntu, "cosign_2.4.3_amd64.deb"),
            (OsFamily::Fedora, "cosign-2.4.3-1.x86_64.rpm"),
            (OsFamily::Wolfi, "cosign_2.4.3_x86_64.apk"),
        ];
        for (family, expected) in cases {
            let request = SelectRequest::new("cosign", Platform::new("linux", "amd64"))
                .with_download_type(Some(DownloadType::Package))
                .with_family(Some(family));
            let selection = selector.select(&items, &request).unwrap();
            assert_eq!(selection.asset.name, expected, "{}", family);
        }
    }

    #[test]
    fn test_select_archive_over_package() {
        let tables = Tables::builtin().unwrap();
        let items = release(
            &tables,
            &["tool_2.4.3_amd64.deb", "tool-linux-amd64", "tool-linux-amd64.tar.gz"],
        );
        let request = SelectRequest::new("tool", Platform::new("linux", "x86_64"));

        let selection = VariantSelector::new(&tables).select(&items, &request).unwrap();
        assert_eq!(selection.asset.name, "tool-linux-amd64.tar.gz");
        assert_eq!(selection.filename, "tool-linux-amd64.tar.gz");
    }

    #[test]
    fn test_select_skips_signatures() {
        let tables = Tables::builtin().unwrap();
        let items = release(
            &tables,
            &["tool-linux-arm64.sig", "tool-linux-arm64-keyless.pem", "tool-linux-arm64"],
        );
        let request = SelectRequest::new("tool", Platform::new("linux", "aarch64"))
            .with_download_type(Some(DownloadType::Binary));

        let selection = VariantSelector::new(&tables).select(&items, &request).unwrap();
        assert_eq!(selection.asset.name, "tool-linux-arm64");
    }

    #[test]
    fn test_select_standalone_asset() {
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let request = SelectRequest::new("cosign_checksums.txt", Platform::new("linux", "x86_64"));

        let selection = VariantSelector::new(&tables).select(&items, &request).unwrap();
        assert_eq!(selection.asset.name, "cosign_checksums.txt");
        assert_eq!(selection.filename, "cosign_checksums.txt");
    }

    #[test]
    fn test_select_unknown_name() {
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let request = SelectRequest::new("rekor-cli", Platform::new("linux", "x86_64"));

        let err = VariantSelector::new(&tables).select(&items, &request).unwrap_err();
        assert_eq!(err, SelectError::NoMatchingName("rekor-cli".into()));
    }

    #[test]
    fn test_select_no_platform_variant() {
        let tables = Tables::builtin().unwrap();
        let items = release(&tables, COSIGN);
        let selector = VariantSelector::new(&tables);

        let request = SelectRequest::new("cosign", Platform::new("freebsd", "x86_64"));
        let err = selector.select(&items, &request).unwrap_err();
        assert!(matches!(err, SelectError::NoPlatformVariant { .. }));

        let request = SelectRequest::new("cosign", Platform::new("darwin", "arm64"))
            .with_download_type(Some(DownloadType::Package));
        let err = selector.select(&items, &request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"cosign\" has no package variant for darwin/arm64"
        );
    }

    #[test]
    fn test_is_release_metadata() {
        assert!(is_release_metadata("tool-linux-amd64.sig"));
        assert!(is_release_metadata("tool-linux-amd64-keyless.PEM"));
        assert!(is_release_metadata("tool_checksums.txt"));
        assert!(is_release_metadata("tool.spdx.json"));
        assert!(!is_release_metadata("tool-linux-amd64"));
        assert!(!is_release_metadata("tool-linux-amd64.tar.gz"));
    }
}

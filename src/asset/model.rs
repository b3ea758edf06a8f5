use chrono::{DateTime, Utc};

use crate::system::Platform;

use super::classify::Classification;

/// One file published as part of a release.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Asset {
    pub host: String,
    pub org: String,
    pub repo: String,
    pub version: String,

    pub name: String,
    pub download_url: String,
    pub author: String,
    pub size: u64,
    pub label: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    /// Derived from the filename by the classifier.
    pub os: Option<String>,
    pub arch: Option<String>,
    pub package_type: Option<String>,
    pub archive_type: Option<String>,
}

impl Asset {
    pub fn is_package(&self) -> bool {
        self.package_type.is_some()
    }

    pub fn is_archive(&self) -> bool {
        self.archive_type.is_some()
    }

    /// A bare executable or any other file that is neither package nor archive.
    pub fn is_binary(&self) -> bool {
        !self.is_package() && !self.is_archive()
    }

    pub fn matches_platform(&self, platform: &Platform) -> bool {
        self.os.as_deref() == Some(platform.os.as_str())
            && self.arch.as_deref() == Some(platform.arch.as_str())
    }

    pub(crate) fn apply(&mut self, classification: Classification) {
        self.os = classification.os;
        self.arch = classification.arch;
        self.package_type = classification.package_type;
        self.archive_type = classification.archive_type;
    }
}

/// A group of assets that are OS/arch variants, packages or archives of the
/// same application.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Installable {
    pub host: String,
    pub org: String,
    pub repo: String,
    pub version: String,

    pub name: String,
    pub variants: Vec<Asset>,
}

impl Installable {
    /// Creates an empty installable that inherits the provenance of `asset`.
    pub(crate) fn named_after(name: String, asset: &Asset) -> Self {
        Self {
            host: asset.host.clone(),
            org: asset.org.clone(),
            repo: asset.repo.clone(),
            version: asset.version.clone(),
            name,
            variants: Vec::new(),
        }
    }

    /// Distinct OS labels across the variants, in variant order.
    pub fn os_variants(&self) -> Vec<&str> {
        distinct(self.variants.iter().filter_map(|v| v.os.as_deref()))
    }

    /// Distinct architecture labels across the variants, in variant order.
    pub fn arch_variants(&self) -> Vec<&str> {
        distinct(self.variants.iter().filter_map(|v| v.arch.as_deref()))
    }

    pub fn package_types(&self) -> Vec<&str> {
        distinct(self.variants.iter().filter_map(|v| v.package_type.as_deref()))
    }

    pub fn archive_types(&self) -> Vec<&str> {
        distinct(self.variants.iter().filter_map(|v| v.archive_type.as_deref()))
    }

    pub fn has_packages(&self) -> bool {
        self.variants.iter().any(Asset::is_package)
    }

    pub fn has_archives(&self) -> bool {
        self.variants.iter().any(Asset::is_archive)
    }

    /// The first variant built for `platform`.
    pub fn variant_for(&self, platform: &Platform) -> Option<&Asset> {
        self.variants.iter().find(|v| v.matches_platform(platform))
    }

    /// The variant for the host platform, falling back to the first variant.
    /// Scalar fields such as size and author are reported from it.
    pub fn primary_variant(&self) -> Option<&Asset> {
        self.variant_for(&Platform::detect())
            .or_else(|| self.variants.first())
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// A published release of a repository, as shown by `ls --releases`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Release {
    pub host: String,
    pub org: String,
    pub repo: String,
    /// The release tag.
    pub version: String,
    pub author: String,
    pub prerelease: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// An entry of an aggregated release listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseItem {
    Asset(Asset),
    Installable(Installable),
}

impl ReleaseItem {
    pub fn name(&self) -> &str {
        match self {
            ReleaseItem::Asset(a) => &a.name,
            ReleaseItem::Installable(i) => &i.name,
        }
    }

    pub fn host(&self) -> &str {
        match self {
            ReleaseItem::Asset(a) => &a.host,
            ReleaseItem::Installable(i) => &i.host,
        }
    }

    pub fn org(&self) -> &str {
        match self {
            ReleaseItem::Asset(a) => &a.org,
            ReleaseItem::Installable(i) => &i.org,
        }
    }

    pub fn repo(&self) -> &str {
        match self {
            ReleaseItem::Asset(a) => &a.repo,
            ReleaseItem::Installable(i) => &i.repo,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            ReleaseItem::Asset(a) => &a.version,
            ReleaseItem::Installable(i) => &i.version,
        }
    }

    pub fn size(&self) -> u64 {
        self.representative().map(|a| a.size).unwrap_or(0)
    }

    pub fn author(&self) -> &str {
        self.representative().map(|a| a.author.as_str()).unwrap_or("")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.representative().and_then(|a| a.created_at)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.representative().and_then(|a| a.updated_at)
    }

    pub fn download_url(&self) -> &str {
        self.representative()
            .map(|a| a.download_url.as_str())
            .unwrap_or("")
    }

    /// Number of release files this entry stands for.
    pub fn asset_count(&self) -> usize {
        match self {
            ReleaseItem::Asset(_) => 1,
            ReleaseItem::Installable(i) => i.variants.len(),
        }
    }

    fn representative(&self) -> Option<&Asset> {
        match self {
            ReleaseItem::Asset(a) => Some(a),
            ReleaseItem::Installable(i) => i.primary_variant(),
        }
    }
}

//! Package and archive file extensions.

pub const PACKAGE_RPM: &str = "rpm";
pub const PACKAGE_DEB: &str = "deb";
pub const PACKAGE_APK: &str = "apk";
pub const PACKAGE_DMG: &str = "dmg";
pub const PACKAGE_MSI: &str = "msi";
pub const PACKAGE_WHL: &str = "whl";

pub const ARCHIVE_ZIP: &str = "zip";
pub const ARCHIVE_TAR: &str = "tar";
pub const ARCHIVE_BZ2: &str = "bz2";
pub const ARCHIVE_GZ: &str = "gz";
pub const ARCHIVE_XZ: &str = "xz";
pub const ARCHIVE_RAR: &str = "rar";
pub const ARCHIVE_L7: &str = "l7";
pub const ARCHIVE_TGZ: &str = "tgz";
pub const ARCHIVE_7Z: &str = "7z";

/// File types keyed by the extensions that identify them. A type may have
/// several extensions, including compound ones such as `tar.gz`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionList {
    entries: Vec<(String, Vec<String>)>,
}

impl ExtensionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_type: &str, extensions: &[&str]) -> Self {
        self.entries.push((
            file_type.to_string(),
            extensions.iter().map(|e| e.to_lowercase()).collect(),
        ));
        self
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|(_, exts)| exts.iter().map(String::as_str))
    }

    /// Returns the type whose extension is the longest `.ext` suffix of
    /// `filename`, so `file.tar.gz` resolves to `tgz` rather than `gz`.
    pub fn type_from_file(&self, filename: &str) -> Option<&str> {
        self.type_extension_from_file(filename).map(|(t, _)| t)
    }

    /// Like [`type_from_file`](Self::type_from_file) but also returns the
    /// matched extension.
    pub fn type_extension_from_file(&self, filename: &str) -> Option<(&str, &str)> {
        let lower = filename.to_lowercase();
        let mut best: Option<(&str, &str)> = None;
        for (file_type, exts) in &self.entries {
            for ext in exts {
                let matched = lower
                    .strip_suffix(ext.as_str())
                    .is_some_and(|rest| rest.ends_with('.'));
                if !matched {
                    continue;
                }
                if best.is_none_or(|(_, b)| ext.len() > b.len()) {
                    best = Some((file_type.as_str(), ext.as_str()));
                }
            }
        }
        best
    }
}

pub fn builtin_package_extensions() -> ExtensionList {
    ExtensionList::new()
        .with(PACKAGE_RPM, &["rpm"])
        .with(PACKAGE_DEB, &["deb"])
        .with(PACKAGE_APK, &["apk"])
        .with(PACKAGE_DMG, &["dmg"])
        .with(PACKAGE_MSI, &["msi"])
        // Python wheel
        .with(PACKAGE_WHL, &["whl"])
}

pub fn builtin_archive_extensions() -> ExtensionList {
    ExtensionList::new()
        .with(ARCHIVE_ZIP, &["zip"])
        .with(ARCHIVE_TAR, &["tar"])
        .with(ARCHIVE_BZ2, &["bz2", "bz"])
        .with(ARCHIVE_GZ, &["gz"])
        .with(ARCHIVE_XZ, &["xz"])
        .with(ARCHIVE_RAR, &["rar"])
        .with(ARCHIVE_L7, &["l7"])
        .with(ARCHIVE_TGZ, &["tar.gz", "tgz"])
        .with(ARCHIVE_7Z, &["7z"])
}

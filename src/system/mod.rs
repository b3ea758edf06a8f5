//! Platform vocabulary: OS and architecture labels, file type extensions,
//! the patterns derived from them, and host detection.

pub mod extension;
pub mod family;
pub mod labels;
mod pattern;
mod platform;
mod tables;

pub use extension::ExtensionList;
pub use family::{OsFamily, detect_os_family, parse_os_release};
pub use labels::CanonicalLabel;
pub use pattern::{FILENAME_SEPARATORS, PatternCache, trim_separator_suffix};
pub use platform::Platform;
pub use tables::{Tables, TablesError};

pub(crate) use tables::LabelMatcher;

//! Release asset model and the logic that turns a flat asset listing into
//! installables and picks the file to download.
//!
//! Everything here is synchronous and free of I/O. The [`Tables`] passed in
//! carries all lookup configuration.
//!
//! [`Tables`]: crate::system::Tables

mod aggregate;
mod app_spec;
mod classify;
mod model;
mod select;

pub use aggregate::aggregate;
pub use app_spec::{AppSpec, DEFAULT_HOST};
pub use classify::{Classification, arch_from_filename, classify, os_from_filename};
pub use model::{Asset, Installable, Release, ReleaseItem};
pub use select::{
    DownloadType, SelectError, SelectRequest, Selection, VariantSelector, is_release_metadata,
};

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::asset::Selection;
use crate::http::HttpClient;
use crate::runtime::Runtime;

/// Where a selection is saved. With neither field set the file lands in the
/// working directory under the selection's filename.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadOptions {
    /// Explicit target file, overrides the computed name.
    pub output_file: Option<PathBuf>,
    /// Directory that receives the file under its computed name.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
}

pub fn target_path(selection: &Selection, options: &DownloadOptions) -> PathBuf {
    match (&options.output_file, &options.output_dir) {
        (Some(file), _) => file.clone(),
        (None, Some(dir)) => dir.join(&selection.filename),
        (None, None) => PathBuf::from(&selection.filename),
    }
}

/// Downloads the selected asset. Refuses to replace an existing file and
/// removes a partially written one when the transfer fails.
#[tracing::instrument(skip(runtime, http_client, selection), fields(asset = %selection.asset.name))]
pub async fn download_selection<R: Runtime>(
    runtime: &R,
    http_client: &HttpClient,
    selection: &Selection,
    options: &DownloadOptions,
) -> Result<Downloaded> {
    let url = selection.asset.download_url.as_str();
    if url.is_empty() {
        bail!("asset {} has no download URL", selection.asset.name);
    }

    let path = target_path(selection, options);
    if runtime.exists(&path) {
        bail!("{} already exists, will not overwrite", path.display());
    }
    if options.output_file.is_none() {
        if let Some(dir) = &options.output_dir {
            if !runtime.is_dir(dir) {
                debug!("Creating output directory {}", dir.display());
                runtime.create_dir_all(dir)?;
            }
        }
    }

    info!("Downloading {} to {}...", url, path.display());
    let result = http_client
        .download_file(url, || {
            runtime
                .create_file(&path)
                .with_context(|| format!("Failed to create {}", path.display()))
        })
        .await;

    match result {
        Ok(bytes) => {
            info!("Saved {} ({} bytes).", path.display(), bytes);
            Ok(Downloaded { path, bytes })
        }
        Err(e) => {
            discard_partial(runtime, &path);
            Err(e.context(format!("Failed to download {}", selection.asset.name)))
        }
    }
}

fn discard_partial<R: Runtime>(runtime: &R, path: &Path) {
    if !runtime.exists(path) {
        return;
    }
    if let Err(e) = runtime.remove_file(path) {
        warn!("Failed to remove partial download {}: {}", path.display(), e);
    }
}

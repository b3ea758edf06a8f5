use anyhow::{Result, bail};
use log::{debug, info};
use std::path::PathBuf;

use crate::{
    asset::{AppSpec, DownloadType, SelectRequest, VariantSelector, aggregate},
    download::{DownloadOptions, Downloaded, download_selection},
    http::HttpClient,
    runtime::Runtime,
    source::Source,
    system::{Platform, Tables, detect_os_family},
};

use super::config::Config;
use super::services::Services;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetOptions {
    /// `os/arch` slug, defaults to the running platform.
    pub platform: Option<String>,
    pub download_type: Option<DownloadType>,
    pub output: Option<PathBuf>,
    pub dir: Option<PathBuf>,
}

/// Download the release file of an application that fits a platform.
#[tracing::instrument(skip(runtime, api_url))]
pub async fn get<R: Runtime>(
    runtime: &R,
    app: &str,
    options: GetOptions,
    api_url: Option<String>,
    timeout_secs: u64,
) -> Result<()> {
    let spec = app.parse::<AppSpec>()?;
    let config = Config::load(runtime, api_url, timeout_secs)?;
    let services = Services::from_config(&config)?;
    let tables = Tables::builtin()?;

    let downloaded = run(
        runtime,
        &services.source,
        &services.http_client,
        &tables,
        &spec,
        &options,
    )
    .await?;
    println!("{}", downloaded.path.display());
    Ok(())
}

#[tracing::instrument(skip(runtime, source, http_client, tables))]
pub async fn run<R: Runtime, S: Source + ?Sized>(
    runtime: &R,
    source: &S,
    http_client: &HttpClient,
    tables: &Tables,
    spec: &AppSpec,
    options: &GetOptions,
) -> Result<Downloaded> {
    if spec.host != source.host() {
        bail!("Unsupported host {}, only {} is supported", spec.host, source.host());
    }

    let host = Platform::detect();
    let platform = match &options.platform {
        Some(slug) => Platform::parse_slug(tables, slug)?,
        None => host.clone(),
    };
    // the local distribution only says something about packages for this OS
    let family = if platform.os == host.os {
        detect_os_family(runtime)
    } else {
        None
    };
    debug!("Selecting for {} (family {:?})", platform, family);

    let assets = source
        .release_assets(&spec.repo, spec.version.clone())
        .await?;
    let items = aggregate(tables, assets);

    let request = SelectRequest::new(spec.target_name(), platform)
        .with_download_type(options.download_type)
        .with_family(family);
    let selection = VariantSelector::new(tables).select(&items, &request)?;
    info!("Selected {} from {}", selection.asset.name, spec);

    let download_options = DownloadOptions {
        output_file: options.output.clone(),
        output_dir: options.dir.clone(),
    };
    download_selection(runtime, http_client, &selection, &download_options).await
}

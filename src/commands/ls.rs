use anyhow::{Result, bail};
use log::debug;
use std::io::Write;

use crate::{
    asset::{AppSpec, ReleaseItem, aggregate, classify},
    render::Renderer,
    runtime::Runtime,
    source::Source,
    system::Tables,
};

use super::config::{Config, DEFAULT_TIMEOUT_SECS};
use super::services::Services;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LsOptions {
    /// Show flags, author, size and date columns.
    pub long: bool,
    /// List every file instead of grouping variants into installables.
    pub all: bool,
    /// List the repository's releases instead of one release's files.
    pub releases: bool,
}

/// List the release assets of an application.
#[tracing::instrument(skip(runtime, api_url))]
pub async fn ls<R: Runtime>(
    runtime: &R,
    app: &str,
    options: LsOptions,
    api_url: Option<String>,
) -> Result<()> {
    let spec = app.parse::<AppSpec>()?;
    let config = Config::load(runtime, api_url, DEFAULT_TIMEOUT_SECS)?;
    let services = Services::from_config(&config)?;
    let tables = Tables::builtin()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&services.source, &tables, &spec, options, &mut out).await
}

#[tracing::instrument(skip(source, tables, out))]
pub async fn run<S: Source + ?Sized, W: Write>(
    source: &S,
    tables: &Tables,
    spec: &AppSpec,
    options: LsOptions,
    out: &mut W,
) -> Result<()> {
    if spec.host != source.host() {
        bail!("Unsupported host {}, only {} is supported", spec.host, source.host());
    }

    let renderer = Renderer::new(options.long);

    if options.releases {
        if let Some(version) = &spec.version {
            debug!("Ignoring version {} while listing releases", version);
        }
        let releases = source.list_releases(&spec.repo).await?;
        return renderer.render_releases(out, &spec.repo.owner, &releases);
    }

    let assets = source
        .release_assets(&spec.repo, spec.version.clone())
        .await?;
    debug!("Release of {} has {} assets", spec.repo, assets.len());

    let items: Vec<ReleaseItem> = if options.all {
        assets
            .into_iter()
            .map(|mut asset| {
                asset.apply(classify(tables, &asset.name));
                ReleaseItem::Asset(asset)
            })
            .collect()
    } else {
        aggregate(tables, assets)
    };

    renderer.render(out, &spec.repo.owner, &items)
}

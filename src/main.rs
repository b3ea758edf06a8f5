use anyhow::Result;
use clap::Parser;
use ghdrop::asset::DownloadType;
use ghdrop::commands::{GetOptions, LsOptions, config::DEFAULT_TIMEOUT_SECS, get, ls};
use std::path::PathBuf;

/// ghdrop - list and fetch GitHub release assets
///
/// Groups the files of a release into installables, one per application, and
/// downloads the variant that fits a platform.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
///
/// Examples:
///   ghdrop ls -l sigstore/cosign          # Long listing of the latest release
///   ghdrop ls -r sigstore/cosign          # List the releases of the repository
///   ghdrop get sigstore/cosign@v2.4.3     # Download cosign for this machine
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(
        long = "api-url",
        env = "GHDROP_API_URL",
        value_name = "URL",
        global = true
    )]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the assets of a release
    Ls(LsArgs),

    /// Download the release asset that fits a platform
    Get(GetArgs),
}

#[derive(clap::Args, Debug)]
pub struct LsArgs {
    /// The application in the format "[host/]owner/repo[@version][#name]"
    #[arg(value_name = "APP")]
    pub app: String,

    /// Use the long listing format
    #[arg(short = 'l', long = "long")]
    pub long: bool,

    /// List every file instead of grouping them into installables
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// List the repository's releases instead of their assets
    #[arg(short = 'r', long = "releases")]
    pub releases: bool,
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// The application in the format "[host/]owner/repo[@version][#name]"
    #[arg(value_name = "APP")]
    pub app: String,

    /// Target platform as os/arch (defaults to this machine)
    #[arg(short = 'p', long = "platform", value_name = "OS/ARCH")]
    pub platform: Option<String>,

    /// Kind of file to download: binary, package or archive
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub download_type: Option<DownloadType>,

    /// Save to this file
    #[arg(short = 'o', long = "output", value_name = "FILE", conflicts_with = "dir")]
    pub output: Option<PathBuf>,

    /// Save into this directory
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Seconds the download may take
    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = ghdrop::runtime::RealRuntime;

    match cli.command {
        Commands::Ls(args) => {
            let options = LsOptions {
                long: args.long,
                all: args.all,
                releases: args.releases,
            };
            ls(&runtime, &args.app, options, cli.api_url).await?
        }
        Commands::Get(args) => {
            let options = GetOptions {
                platform: args.platform,
                download_type: args.download_type,
                output: args.output,
                dir: args.dir,
            };
            get(&runtime, &args.app, options, cli.api_url, args.timeout).await?
        }
    }
    Ok(())
}

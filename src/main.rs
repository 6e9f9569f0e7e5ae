use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use solc_pragma::config::{self, Config};
use solc_pragma::batch::resolve_files;
use solc_pragma::toolchain::{SolcSelectInstaller, ToolchainSwitcher};
use solc_pragma::version::cache::CatalogCache;
use solc_pragma::version::provider::VersionCatalogProvider;
use solc_pragma::version::providers::{
    BinariesCatalogProvider, CachedCatalogProvider, FileCatalogProvider,
};

#[derive(Parser)]
#[command(name = "solc-pragma")]
#[command(version, about = "Pick and activate the solc version a Solidity file asks for")]
struct Cli {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write JSON logs, to PATH or to the data directory
    #[arg(long, global = true, value_name = "PATH", require_equals = true)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CatalogArgs {
    /// Read the catalog from a local file (one version per line)
    #[arg(long, global = true, value_name = "PATH")]
    catalog_file: Option<PathBuf>,

    /// Platform directory on the binaries server (e.g. linux-amd64)
    #[arg(long, global = true)]
    platform: Option<String>,

    /// Only use the cached catalog
    #[arg(long, global = true, conflicts_with = "no_cache")]
    offline: bool,

    /// Bypass the catalog cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the version each file resolves to
    Resolve {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat files without a pragma as errors
        #[arg(long)]
        strict: bool,
    },
    /// Install and activate the version a file resolves to
    Use { file: PathBuf },
    /// List the catalog, newest first
    Versions {
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(config::log_path));
    let _guard = solc_pragma::logging::init(cli.verbose, log_file.as_deref())?;

    let mut config = Config::load(&config::config_path())?;
    apply_overrides(&mut config, &cli.catalog);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config, &cli.catalog))
}

fn apply_overrides(config: &mut Config, args: &CatalogArgs) {
    if let Some(file) = &args.catalog_file {
        config.catalog.list_file = Some(file.clone());
    }
    if let Some(platform) = &args.platform {
        config.catalog.platform = platform.clone();
    }
}

fn build_provider(
    config: &Config,
    args: &CatalogArgs,
) -> anyhow::Result<Arc<dyn VersionCatalogProvider>> {
    if let Some(list_file) = &config.catalog.list_file {
        debug!("Using local catalog {:?}", list_file);
        return Ok(Arc::new(FileCatalogProvider::new(list_file)));
    }

    let binaries = BinariesCatalogProvider::new(&config.catalog.base_url, &config.catalog.platform);
    if args.no_cache {
        return Ok(Arc::new(binaries));
    }

    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    let cache = CatalogCache::new(&config::db_path(), config.cache.refresh_interval)?;

    Ok(Arc::new(
        CachedCatalogProvider::new(binaries, Arc::new(cache)).offline(args.offline),
    ))
}

async fn run(command: Command, config: Config, args: &CatalogArgs) -> anyhow::Result<()> {
    let provider = build_provider(&config, args)?;

    match command {
        Command::Resolve { files, strict } => {
            let report = resolve_files(provider.as_ref(), &files, strict).await;
            for file in &report.files {
                match &file.outcome {
                    Ok(selection) => println!("{}: {}", file.path.display(), selection.version),
                    Err(_) if file.is_missing_directive() && !strict => {
                        println!("{}: no pragma solidity directive", file.path.display());
                    }
                    Err(e) => eprintln!("{}: {}", file.path.display(), e),
                }
            }
            if !report.is_success() {
                anyhow::bail!(
                    "{} of {} files failed to resolve",
                    report.failures(),
                    report.files.len()
                );
            }
            Ok(())
        }
        Command::Use { file } => {
            let source = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let installer = SolcSelectInstaller::new(
                config.toolchain.binary_dir(),
                config.toolchain.solc_select.clone(),
            );
            let switcher = ToolchainSwitcher::new(provider, Arc::new(installer));
            let selection = switcher
                .switch(&source)
                .await
                .with_context(|| format!("{}", file.display()))?;
            println!("solc {} activated", selection.version);
            Ok(())
        }
        Command::Versions { limit } => {
            let catalog = provider.fetch_catalog().await?;
            for version in catalog.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}", version);
            }
            Ok(())
        }
    }
}

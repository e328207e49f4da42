use super::handlers::{self, Output};
use super::setup::{parse_cli, Cli, Commands};
use anyhow::Result;
use folioapp::config::FolioConfig;
use folioapp::store::FileStore;
use folioapp::FolioApi;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `FOLIO_LOG=folioapp=debug`.
pub const LOG_ENV: &str = "FOLIO_LOG";

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let mut api = open_api(&cli)?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Articles(cmd) => handlers::articles(&mut api, cmd, &out),
        Commands::Categories(cmd) => handlers::categories(&mut api, cmd, &out),
        Commands::Albums(cmd) => handlers::albums(&mut api, cmd, &out),
        Commands::Media(cmd) => handlers::media(&mut api, cmd, &out),
        Commands::Tags(cmd) => handlers::tags(&mut api, cmd, &out),
        Commands::Links(cmd) => handlers::links(&mut api, cmd, &out),
        Commands::Settings(cmd) => handlers::settings(&mut api, cmd, &out),
        Commands::Query(args) => handlers::query(&api, args, &out),
    }
}

/// Logs go to stderr so `--json` output stays clean. `FOLIO_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .init();
}

fn open_api(cli: &Cli) -> Result<FolioApi<FileStore>> {
    let mut config = FolioConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let data_dir = config.data_dir();
    tracing::debug!(data_dir = %data_dir.display(), "opening store");
    Ok(FolioApi::new(FileStore::open(data_dir), config))
}

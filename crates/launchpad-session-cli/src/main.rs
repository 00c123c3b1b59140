/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: Session connect/status/profile/disconnect results on stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, commands or startup flow
*/

mod config;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use launchpad_session::{Chain, SessionConfig, SessionContext, UnavailableNonceSource};

use crate::output::{SessionView, print_json};

#[derive(Parser, Debug)]
#[command(name = "launchpad-session", version, about = "Launchpad session token manager")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Override `store_dir` from the config file
    #[arg(long = "store-dir", value_name = "DIR")]
    store_dir: Option<PathBuf>,
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify, refresh or log in to obtain a bearer token
    Connect {
        #[arg(long, value_parser = parse_chain)]
        chain: Chain,
        #[arg(long)]
        principal: String,
        /// Login nonce obtained from the chain; required when no stored token works
        #[arg(long)]
        nonce: Option<String>,
    },
    /// Print persisted sessions
    Status {
        #[arg(long, value_parser = parse_chain)]
        chain: Option<Chain>,
    },
    /// Reload and print the profile of an authenticated session
    Profile {
        #[arg(long, value_parser = parse_chain)]
        chain: Chain,
    },
    /// Forget stored tokens
    Disconnect {
        #[arg(long, value_parser = parse_chain)]
        chain: Option<Chain>,
        /// Also forget the principal and delete the stored record
        #[arg(long)]
        forget: bool,
    },
}

fn parse_chain(raw: &str) -> std::result::Result<Chain, String> {
    raw.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(config_path = %args.config_path.display(), dry_run = args.dry_run, "starting launchpad-session");

    let mut config = config::load_config(&args.config_path).context("load config")?;
    if let Some(dir) = args.store_dir.clone() {
        config.store_dir = Some(dir);
    }
    info!(chain_count = config.chains.len(), "configuration loaded");

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let command = args
        .command
        .ok_or_else(|| anyhow!("a command is required unless --dry-run is set"))?;
    run(command, &config).await
}

async fn run(command: Command, config: &SessionConfig) -> Result<()> {
    let context = SessionContext::from_config(config, Arc::new(UnavailableNonceSource))
        .context("build session context")?;
    context.restore_all().await;

    match command {
        Command::Connect {
            chain,
            principal,
            nonce,
        } => {
            let manager = context.manager(chain)?;
            // A background profile reload would die with the runtime.
            let connected = manager
                .connect_with_profile(&principal, nonce.as_deref())
                .await
                .with_context(|| format!("connect {chain} session for {principal}"))?;
            let view = SessionView::new(chain, &manager.snapshot())
                .with_via(format!("{:?}", connected.via));
            print_json(&view)
        }
        Command::Status { chain } => {
            let views = selected(&context, chain)?
                .into_iter()
                .map(|chain| -> Result<SessionView> {
                    let session = context.manager(chain)?.snapshot();
                    Ok(SessionView::new(chain, &session))
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&views)
        }
        Command::Profile { chain } => {
            let manager = context.manager(chain)?;
            if !manager.snapshot().is_authenticated() {
                warn!(chain = %chain, "session is not authenticated; run connect first");
            }
            manager.reload_profile().await;
            print_json(&SessionView::new(chain, &manager.snapshot()))
        }
        Command::Disconnect { chain, forget } => {
            for chain in selected(&context, chain)? {
                let manager = context.manager(chain)?;
                if forget {
                    manager.forget().await;
                } else {
                    manager.disconnect().await;
                }
            }
            let views: Vec<_> = context
                .snapshot()
                .iter()
                .map(|(chain, session)| SessionView::new(*chain, session))
                .collect();
            print_json(&views)
        }
    }
}

fn selected(context: &SessionContext, chain: Option<Chain>) -> Result<Vec<Chain>> {
    match chain {
        Some(chain) => {
            context.manager(chain)?;
            Ok(vec![chain])
        }
        None => Ok(context.chains().collect()),
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

//! chartgoal CLI - Helm chart package and deploy goals for delivery pipelines

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod context;
mod error;
mod exit_codes;
mod settings;

use context::GlobalArgs;
use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "chartgoal")]
#[command(version)]
#[command(about = "Package and deploy Helm charts as delivery pipeline goals", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the project contains a Helm chart
    Detect,

    /// Show chart name and version
    Show,

    /// Rewrite the version of every chart descriptor
    SetVersion {
        /// New chart version
        version: String,
    },

    /// Print the version the current commit should carry
    NextVersion {
        /// Also write the version into the chart descriptor(s)
        #[arg(long)]
        write: bool,
    },

    /// Run the helm-package goal
    Package,

    /// Run the helm-deploy goal
    Deploy,

    /// Print the helm options the deploy goal would pass
    Args,
}

/// Initialize tracing on stderr; stdout carries command output
fn init_tracing(debug: bool) {
    let default = if debug {
        "chartgoal=debug,chartgoal_core=debug,chartgoal_helm=debug"
    } else {
        "chartgoal=info,chartgoal_core=info,chartgoal_helm=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug),
        )
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    if !global.project.is_dir() {
        return Err(CliError::Usage {
            message: format!("project directory {} does not exist", global.project.display()),
        });
    }

    match cli.command {
        Commands::Detect => commands::detect::run(global),
        Commands::Show => commands::show::run(global),
        Commands::SetVersion { version } => commands::set_version::run(global, &version),
        Commands::NextVersion { write } => commands::next_version::run(global, write),
        Commands::Package => commands::package::run(global).await,
        Commands::Deploy => commands::deploy::run(global).await,
        Commands::Args => commands::args::run(global).await,
    }
}

#[tokio::main]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    let code = match run(cli).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            let code = e.exit_code();
            eprintln!("{:?}", miette::Report::new(e));
            code
        }
    };
    std::process::exit(code);
}

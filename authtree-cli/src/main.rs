//! `authtree` binary: parse arguments, run one command, print its report as JSON.

use clap::Parser;
use serde::Serialize;

use authtree_cli::{
    analyze, run, validate, validate_all, Cli, CliConfig, Command, Error, RunRequest,
};

/// Initializes tracing on stderr. `RUST_LOG` applies unless `--verbose` asks for debug.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(stderr_layer).init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn execute(cli: &Cli) -> Result<(), Error> {
    let mut config = CliConfig::from_env()?;
    config.apply_options(&cli.options());

    match &cli.command {
        Command::Analyze { tree } => print_json(&analyze(&config, tree)?),
        Command::Validate { tree: Some(tree) } => print_json(&validate(&config, tree)?),
        Command::Validate { tree: None } => print_json(&validate_all(&config)?),
        Command::Run {
            tree,
            state,
            input,
            target_level,
        } => {
            let request = RunRequest {
                tree: tree.clone(),
                state_file: state.clone(),
                input_file: input.clone(),
                target_level: *target_level,
            };
            print_json(&run(&config, &request).await?)
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(&cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

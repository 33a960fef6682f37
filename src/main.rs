use clap::Parser;
use tracing_subscriber::EnvFilter;

use vmstate::backend;
use vmstate::cli::{Cli, OutputFormat};
use vmstate::config;
use vmstate::outcome::Outcome;
use vmstate::reconcile::Reconciler;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // stdout carries the outcome, so logs always go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("vmstate=debug")
    } else {
        EnvFilter::from_default_env()
            .add_directive("vmstate=warn".parse().expect("valid log directive"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(tool) = &cli.tool {
        settings.tool = tool.clone();
    }

    let backend = backend::create_backend(&settings);
    let request = cli.request();
    let outcome = Reconciler::new(&backend, &settings)
        .reconcile(&request)
        .await?;

    print_outcome(&outcome, cli.output);
    Ok(())
}

fn print_outcome(outcome: &Outcome, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(outcome).expect("JSON serialization")
        ),
        OutputFormat::Plain => {
            let label = if outcome.changed { "changed" } else { "ok" };
            if outcome.message.is_empty() {
                println!("{label}");
            } else {
                println!("{label}: {}", outcome.message);
            }
        }
    }
}

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli::app::App;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let app = App::new(&cli);
    let stdout = std::io::stdout();
    app.run(&cli.command, &mut stdout.lock())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("jsonlinesdb={level}")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

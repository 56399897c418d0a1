use clap::Parser;

use readme_forge::{run, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Progress and diagnostics go to stderr; stdout carries only the
    // generated document and interactive prompts.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            2
        }
    };

    std::process::exit(exit_code);
}

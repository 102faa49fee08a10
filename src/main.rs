mod app;
mod cli;
mod collection;
mod config;
mod db;
mod error;
mod models;
mod services;
mod site;

use app::App;
use cli::Console;
use config::Config;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    // Check for --website flag (headless gallery export)
    let website_user = if args.len() >= 3 && args[1] == "--website" {
        Some(args[2].clone())
    } else {
        None
    };

    let mut app = App::new(&config, Console::stdio()).await?;

    if let Some(username) = website_user {
        let result = app.export_website(&username).await;
        app.shutdown().await?;
        return match result {
            Ok(path) => {
                println!("Website for {} written to {}", username, path.display());
                Ok(())
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
    }

    let result = app.run().await;
    app.shutdown().await?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

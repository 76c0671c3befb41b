mod config;
mod executor;

use std::io::Read;

use mongobridge_query::{BridgeError, QueryRequest};

use config::Config;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout carries exactly one result envelope.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BridgeError> {
    let config = Config::from_env()?;

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| BridgeError::MalformedInput(e.to_string()))?;

    let request = QueryRequest::from_json(&raw)?.rewrite_ids();
    tracing::debug!(
        database = %request.database,
        collection = %request.collection,
        mode = ?request.mode,
        "dispatching query"
    );

    let client = executor::connect(&config).await?;
    let envelope = executor::execute(&client, request).await?;

    println!("{}", envelope.to_json()?);
    Ok(())
}

use std::process::ExitCode;

use order_schema_init::{
    config,
    services::{db_init, mongo},
    InitError,
};

async fn run() -> Result<(), InitError> {
    let settings = config::load();

    let db = mongo::connect(&settings).await?;
    db_init::initialize(&db).await?;

    let report = db_init::verify_schema(&db).await?;
    if !report.is_complete() {
        return Err(InitError::Incomplete(report));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout is reserved for the confirmation line
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run().await {
        Ok(()) => {
            println!("Database initialized successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("schema initialization failed: {e}");
            ExitCode::FAILURE
        }
    }
}

use mongodb::{
    bson::doc,
    options::ClientOptions,
    Client, Database,
};
use tracing::info;

use crate::{config::Settings, error::InitError};

pub const APP_NAME: &str = "order-schema-init";

/// `uri` with any `user:password@` part replaced by `***@`, safe to log.
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => uri.to_string(),
    }
}

/// Opens a client for `settings.mongodb_uri` and pings the configured database.
///
/// The driver connects lazily, so the ping is what turns an unreachable
/// server into an error here instead of at the first schema call.
pub async fn connect(settings: &Settings) -> Result<Database, InitError> {
    let redacted = redact_uri(&settings.mongodb_uri);
    let connect_err = |source: mongodb::error::Error| InitError::Connect {
        uri: redacted.clone(),
        source,
    };

    let mut options = ClientOptions::parse(&settings.mongodb_uri)
        .await
        .map_err(connect_err)?;
    options.app_name = Some(APP_NAME.to_string());
    options.server_selection_timeout = Some(settings.server_timeout);
    options.connect_timeout = Some(settings.server_timeout);

    let client = Client::with_options(options).map_err(connect_err)?;
    let db = client.database(&settings.mongodb_db);

    db.run_command(doc! { "ping": 1 }, None)
        .await
        .map_err(connect_err)?;

    info!("connected to MongoDB database '{}'", settings.mongodb_db);
    Ok(db)
}

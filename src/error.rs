use thiserror::Error;

use crate::services::db_init::SchemaReport;

/// Everything that can stop the initializer. Driver errors are kept as the
/// source and printed as-is.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to connect to MongoDB at {uri}: {source}")]
    Connect {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("failed to create collection {collection}: {source}")]
    CreateCollection {
        collection: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("failed to create index on {collection}.{field}: {source}")]
    CreateIndex {
        collection: &'static str,
        field: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("failed to inspect {collection}: {source}")]
    Inspect {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("schema incomplete after initialization: {0}")]
    Incomplete(SchemaReport),
}

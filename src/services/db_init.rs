use std::fmt;

use futures_util::StreamExt;
use mongodb::{
    bson::{Bson, Document},
    error::{Error, ErrorKind},
    options::IndexOptions,
    Database, IndexModel,
};
use tracing::{debug, info};

use crate::error::InitError;

pub const COLLECTIONS: [&str; 3] = ["customers", "products", "orders"];

/// Single-field ascending index on `collection.field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub field: &'static str,
    pub unique: bool,
}

pub static INDEXES: [IndexSpec; 5] = [
    // customers: one account per email
    IndexSpec { collection: "customers", field: "email", unique: true },
    IndexSpec { collection: "products", field: "name", unique: false },
    // orders: lookups by customer, filtering by status, sorting by date
    IndexSpec { collection: "orders", field: "customer_id", unique: false },
    IndexSpec { collection: "orders", field: "status", unique: false },
    IndexSpec { collection: "orders", field: "created_at", unique: false },
];

// server error codes
const NAMESPACE_EXISTS: i32 = 48;

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.field)?;
        if self.unique {
            write!(f, " (unique)")?;
        }
        Ok(())
    }
}

/// What `verify_schema` found missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub missing_collections: Vec<&'static str>,
    pub missing_indexes: Vec<IndexSpec>,
}

impl SchemaReport {
    pub fn is_complete(&self) -> bool {
        self.missing_collections.is_empty() && self.missing_indexes.is_empty()
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete() {
            return write!(f, "nothing missing");
        }

        let indexes: Vec<String> = self.missing_indexes.iter().map(|s| s.to_string()).collect();
        write!(
            f,
            "missing collections [{}]; missing indexes [{}]",
            self.missing_collections.join(", "),
            indexes.join(", ")
        )
    }
}

pub fn is_namespace_exists(err: &Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(cmd) if cmd.code == NAMESPACE_EXISTS)
}

pub fn index_model(spec: &IndexSpec) -> IndexModel {
    let mut keys = Document::new();
    keys.insert(spec.field, 1);

    if spec.unique {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    } else {
        IndexModel::builder().keys(keys).build()
    }
}

/// True when `keys` is exactly `{ field: 1 }`, whatever numeric type the
/// server hands back for the direction.
fn is_ascending_on(keys: &Document, field: &str) -> bool {
    if keys.len() != 1 {
        return false;
    }
    match keys.get(field) {
        Some(Bson::Int32(1)) | Some(Bson::Int64(1)) => true,
        Some(Bson::Double(d)) => *d == 1.0,
        _ => false,
    }
}

fn matches_spec(model: &IndexModel, spec: &IndexSpec) -> bool {
    let unique = model
        .options
        .as_ref()
        .and_then(|o| o.unique)
        .unwrap_or(false);

    is_ascending_on(&model.keys, spec.field) && unique == spec.unique
}

pub async fn ensure_collections(db: &Database) -> Result<(), InitError> {
    for name in COLLECTIONS {
        match db.create_collection(name, None).await {
            Ok(()) => info!("created collection {}", name),
            Err(e) if is_namespace_exists(&e) => debug!("collection {} already exists", name),
            Err(source) => {
                return Err(InitError::CreateCollection {
                    collection: name,
                    source,
                });
            }
        }
    }

    Ok(())
}

/// Creating an index that already exists with the same keys and options is a
/// no-op on the server, so this is safe to re-run. Building the unique index
/// over duplicate data fails and is returned.
pub async fn ensure_indexes(db: &Database) -> Result<(), InitError> {
    for spec in &INDEXES {
        let col = db.collection::<Document>(spec.collection);

        let created = col
            .create_index(index_model(spec), None)
            .await
            .map_err(|source| InitError::CreateIndex {
                collection: spec.collection,
                field: spec.field,
                source,
            })?;

        info!("ensured index {} on {}", created.index_name, spec);
    }

    Ok(())
}

pub async fn initialize(db: &Database) -> Result<(), InitError> {
    ensure_collections(db).await?;
    ensure_indexes(db).await
}

async fn list_index_models(db: &Database, collection: &str) -> Result<Vec<IndexModel>, InitError> {
    let inspect_err = |source: Error| InitError::Inspect {
        collection: collection.to_string(),
        source,
    };

    let mut cursor = db
        .collection::<Document>(collection)
        .list_indexes(None)
        .await
        .map_err(inspect_err)?;

    let mut models = Vec::new();
    while let Some(item) = cursor.next().await {
        models.push(item.map_err(inspect_err)?);
    }

    Ok(models)
}

pub async fn verify_schema(db: &Database) -> Result<SchemaReport, InitError> {
    let existing = db
        .list_collection_names(None)
        .await
        .map_err(|source| InitError::Inspect {
            collection: db.name().to_string(),
            source,
        })?;
    let exists = |name: &str| existing.iter().any(|e| e == name);

    let mut report = SchemaReport::default();

    for name in COLLECTIONS {
        let wanted = INDEXES.iter().filter(|s| s.collection == name);

        if !exists(name) {
            report.missing_collections.push(name);
            report.missing_indexes.extend(wanted.copied());
            continue;
        }

        let present = list_index_models(db, name).await?;
        for spec in wanted {
            if !present.iter().any(|m| matches_spec(m, spec)) {
                report.missing_indexes.push(*spec);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use mongodb::bson::doc;

    use super::*;

    #[test]
    fn every_index_targets_a_declared_collection() {
        for spec in &INDEXES {
            assert!(COLLECTIONS.contains(&spec.collection), "{spec}");
        }
    }

    #[test]
    fn no_index_is_declared_twice() {
        let pairs: HashSet<_> = INDEXES.iter().map(|s| (s.collection, s.field)).collect();
        assert_eq!(pairs.len(), INDEXES.len());
    }

    #[test]
    fn only_customer_email_is_unique() {
        let unique: Vec<_> = INDEXES.iter().filter(|s| s.unique).collect();
        assert_eq!(unique.len(), 1);
        assert_eq!((unique[0].collection, unique[0].field), ("customers", "email"));
    }

    #[test]
    fn unique_model_carries_unique_option() {
        let model = index_model(&INDEXES[0]);
        assert_eq!(model.keys, doc! { "email": 1 });
        assert_eq!(model.options.and_then(|o| o.unique), Some(true));
    }

    #[test]
    fn plain_model_has_no_options() {
        let spec = IndexSpec { collection: "orders", field: "status", unique: false };
        let model = index_model(&spec);
        assert_eq!(model.keys, doc! { "status": 1 });
        assert!(model.options.is_none());
    }

    #[test]
    fn ascending_match_accepts_any_numeric_one() {
        assert!(is_ascending_on(&doc! { "name": 1 }, "name"));
        assert!(is_ascending_on(&doc! { "name": 1_i64 }, "name"));
        assert!(is_ascending_on(&doc! { "name": 1.0 }, "name"));

        assert!(!is_ascending_on(&doc! { "name": -1 }, "name"));
        assert!(!is_ascending_on(&doc! { "name": "text" }, "name"));
        assert!(!is_ascending_on(&doc! { "name": 1, "price": 1 }, "name"));
        assert!(!is_ascending_on(&doc! { "price": 1 }, "name"));
    }

    #[test]
    fn spec_match_checks_uniqueness() {
        let email = INDEXES[0];
        let plain = IndexModel::builder().keys(doc! { "email": 1 }).build();
        let unique = index_model(&email);

        assert!(matches_spec(&unique, &email));
        assert!(!matches_spec(&plain, &email));

        let name = INDEXES[1];
        assert!(matches_spec(&index_model(&name), &name));
        assert!(!matches_spec(&unique, &name));
    }

    #[test]
    fn report_display() {
        assert!(SchemaReport::default().is_complete());
        assert_eq!(SchemaReport::default().to_string(), "nothing missing");

        let report = SchemaReport {
            missing_collections: vec!["products"],
            missing_indexes: vec![INDEXES[1]],
        };
        assert!(!report.is_complete());
        assert_eq!(
            report.to_string(),
            "missing collections [products]; missing indexes [products.name]"
        );
    }
}

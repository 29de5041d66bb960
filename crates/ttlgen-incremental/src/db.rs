//! Salsa database definition for incremental generation
//!
//! The database owns every input revision. Tracked functions in
//! [`queries`](crate::queries) take `&dyn salsa::Database`.

use std::sync::{Arc, Mutex};

/// Main Salsa database implementation
///
/// ## Usage
///
/// ```rust,ignore
/// use ttlgen_incremental::{queries, TtlgenDatabase};
///
/// let mut db = TtlgenDatabase::default();
/// let schema = queries::SchemaFile::new(&db, path, text);
///
/// // Memoized until `schema` changes
/// let document = queries::load_schema(&db, schema);
///
/// schema.set_text(&mut db).to(new_text);
/// ```
#[salsa::db]
#[derive(Default, Clone)]
pub struct TtlgenDatabase {
    storage: salsa::Storage<Self>,
}

impl TtlgenDatabase {
    /// Database that records every query execution into `log`
    ///
    /// Each entry is the debug rendering of the executed query key, e.g.
    /// `load_schema(Id(0))`. Used to observe what an edit recomputes.
    pub fn with_execution_log(log: Arc<Mutex<Vec<String>>>) -> Self {
        let callback = move |event: salsa::Event| {
            if let salsa::EventKind::WillExecute { database_key, .. } = event.kind {
                if let Ok(mut log) = log.lock() {
                    log.push(format!("{database_key:?}"));
                }
            }
        };

        Self {
            storage: salsa::Storage::new(Some(Box::new(callback))),
        }
    }
}

#[salsa::db]
impl salsa::Database for TtlgenDatabase {}

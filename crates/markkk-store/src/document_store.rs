//! DocumentStore - async facade over the versioned local database
//!
//! The connection is opened lazily by the first operation, upgraded to the
//! latest schema, and shared by every later call. Each operation runs one
//! record-level statement on tokio's blocking pool.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use markkk_core::model::document::sort_recent_first;
use markkk_core::{
    log_op_end, log_op_error, log_op_start, Document, ExError, MarkkkError, ThemePreference,
};
use rusqlite::Connection;
use tokio::sync::OnceCell;

use crate::config::StoreConfig;
use crate::db;
use crate::errors::Result;
use crate::migrations;
use crate::repo::SqliteRepo;

type SharedConnection = Arc<Mutex<Connection>>;

static GLOBAL: OnceLock<DocumentStore> = OnceLock::new();

/// Durable storage for Markdown documents and the theme preference
pub struct DocumentStore {
    config: StoreConfig,
    handle: OnceCell<SharedConnection>,
}

impl DocumentStore {
    /// Build an unopened store; nothing touches disk until the first call
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            handle: OnceCell::new(),
        }
    }

    /// The process-wide store, configured from the environment on first use
    pub fn global() -> &'static DocumentStore {
        GLOBAL.get_or_init(|| DocumentStore::new(StoreConfig::from_env()))
    }

    /// True once a connection has been opened and migrated
    pub fn is_open(&self) -> bool {
        self.handle.initialized()
    }

    /// Open and upgrade the database now instead of on first use
    pub async fn open(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }

    /// Highest applied schema version
    pub async fn schema_version(&self) -> Result<u32> {
        self.with_conn(|conn| migrations::current_version(conn)).await
    }

    /// Create and store a new document
    ///
    /// `name` falls back to a random `doc-xxxxxx` token.
    pub async fn save_document(
        &self,
        content: impl Into<String>,
        name: Option<&str>,
    ) -> Result<Document> {
        let started = Instant::now();
        log_op_start!("save_document");

        let doc = Document::new(content, name);
        let record = doc.clone();
        let result = self
            .with_conn(move |conn| SqliteRepo::insert_document(conn, &record))
            .await
            .map(|_| doc);

        finish("save_document", started, result)
    }

    /// All documents, most recently touched first
    pub async fn get_documents(&self) -> Result<Vec<Document>> {
        let started = Instant::now();
        log_op_start!("get_documents");

        let result = self
            .with_conn(|conn| SqliteRepo::list_documents(conn))
            .await
            .map(|mut docs| {
                sort_recent_first(&mut docs);
                docs
            });

        if let Ok(docs) = &result {
            tracing::trace!(doc_count = docs.len(), "listed documents");
        }
        finish("get_documents", started, result)
    }

    /// Point lookup; `None` when the id is unknown
    pub async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let started = Instant::now();
        log_op_start!("get_document", document_id = id);

        let id = id.to_string();
        let result = self
            .with_conn(move |conn| SqliteRepo::get_document(conn, &id))
            .await;

        finish("get_document", started, result)
    }

    /// Remove a document; unknown ids are ignored
    pub async fn delete_document(&self, id: &str) -> Result<()> {
        let started = Instant::now();
        log_op_start!("delete_document", document_id = id);

        let id = id.to_string();
        let result = self
            .with_conn(move |conn| SqliteRepo::delete_document(conn, &id))
            .await
            .map(|removed| {
                tracing::trace!(removed, "delete finished");
            });

        finish("delete_document", started, result)
    }

    /// Replace the record stored under `doc.id`, inserting it if absent
    ///
    /// Callers set `updated_at` (see [`Document::touch`]) before calling.
    pub async fn update_document(&self, doc: &Document) -> Result<()> {
        let started = Instant::now();
        log_op_start!("update_document", document_id = doc.id.as_str());

        let record = doc.clone();
        let result = self
            .with_conn(move |conn| SqliteRepo::put_document(conn, &record))
            .await;

        finish("update_document", started, result)
    }

    /// Overwrite the selected theme
    pub async fn save_theme(&self, theme: &str) -> Result<()> {
        let started = Instant::now();
        log_op_start!("save_theme");

        let record = ThemePreference::selected(theme);
        let result = self
            .with_conn(move |conn| SqliteRepo::put_theme(conn, &record))
            .await;

        finish("save_theme", started, result)
    }

    /// The selected theme, storing and returning the default when unset
    pub async fn get_theme(&self) -> Result<String> {
        let started = Instant::now();
        log_op_start!("get_theme");

        let result = self
            .with_conn(|conn| match SqliteRepo::get_theme(conn)? {
                Some(stored) => Ok(stored.value),
                None => {
                    let default = ThemePreference::default();
                    SqliteRepo::put_theme(conn, &default)?;
                    tracing::debug!(theme = default.value.as_str(), "materialized default theme");
                    Ok(default.value)
                }
            })
            .await;

        finish("get_theme", started, result)
    }

    /// The shared connection, opening and migrating it on first use
    ///
    /// Concurrent first callers wait on the same initialization. A failed
    /// open leaves the cell empty so the next call tries again.
    async fn connection(&self) -> Result<SharedConnection> {
        self.handle
            .get_or_try_init(|| {
                let config = self.config.clone();
                async move {
                    run_blocking(move || {
                        let started = Instant::now();
                        log_op_start!("open_store");

                        let opened = db::open_with(&config).and_then(|mut conn| {
                            let version = migrations::apply_migrations(&mut conn)?;
                            tracing::debug!(schema_version = version, "store ready");
                            Ok(Arc::new(Mutex::new(conn)))
                        });

                        finish("open_store", started, opened)
                    })
                    .await
                }
            })
            .await
            .cloned()
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.connection().await?;
        run_blocking(move || {
            let mut conn = handle
                .lock()
                .map_err(|_| ExError::from(MarkkkError::LockPoisoned))?;
            f(&mut *conn)
        })
        .await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        ExError::from(MarkkkError::TaskFailed {
            reason: e.to_string(),
        })
    })?
}

fn finish<T>(op: &'static str, started: Instant, result: Result<T>) -> Result<T> {
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(err) => {
            log_op_error!(op, *err, duration_ms = duration_ms);
        }
    }
    result
}

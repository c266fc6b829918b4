//! SQLite repository implementation
//!
//! Every function touches exactly one record (or reads one collection) and
//! runs as a single statement.

use crate::errors::{from_rusqlite, is_primary_key_violation, Result};
use markkk_core::model::timestamp;
use markkk_core::{Document, MarkkkError, ThemePreference, THEME_RECORD_ID};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

const DOCUMENT_COLUMNS: &str = "id, name, content, created_at, updated_at";

/// SQLite repository for documents and the theme preference
pub struct SqliteRepo;

impl SqliteRepo {
    /// Insert a new document
    ///
    /// Fails with `AlreadyExists` if the id is taken.
    pub fn insert_document(conn: &Connection, doc: &Document) -> Result<()> {
        conn.execute(
            "INSERT INTO documents (id, name, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                doc.id,
                doc.name,
                doc.content,
                timestamp::format(&doc.created_at),
                doc.updated_at.as_ref().map(timestamp::format),
            ],
        )
        .map_err(|e| {
            if is_primary_key_violation(&e) {
                MarkkkError::DocumentAlreadyExists {
                    document_id: doc.id.clone(),
                }
                .into()
            } else {
                from_rusqlite(e)
            }
        })?;

        Ok(())
    }

    /// Insert or fully replace a document keyed by its id
    pub fn put_document(conn: &Connection, doc: &Document) -> Result<()> {
        conn.execute(
            "INSERT INTO documents (id, name, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                content = excluded.content,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at",
            rusqlite::params![
                doc.id,
                doc.name,
                doc.content,
                timestamp::format(&doc.created_at),
                doc.updated_at.as_ref().map(timestamp::format),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Get a document by ID
    pub fn get_document(conn: &Connection, id: &str) -> Result<Option<Document>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM documents WHERE id = ?1",
                DOCUMENT_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        stmt.query_row([id], document_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    /// All documents in primary-key order
    pub fn list_documents(conn: &Connection) -> Result<Vec<Document>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM documents ORDER BY id",
                DOCUMENT_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let docs = stmt
            .query_map([], document_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(docs)
    }

    /// Delete a document, returning whether a row was removed
    pub fn delete_document(conn: &Connection, id: &str) -> Result<bool> {
        let removed = conn
            .execute("DELETE FROM documents WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;

        Ok(removed > 0)
    }

    /// Get the stored theme preference, if any
    pub fn get_theme(conn: &Connection) -> Result<Option<ThemePreference>> {
        conn.query_row(
            "SELECT id, value FROM theme WHERE id = ?1",
            [THEME_RECORD_ID],
            |row| {
                Ok(ThemePreference {
                    id: row.get(0)?,
                    value: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Insert or replace the theme preference
    pub fn put_theme(conn: &Connection, theme: &ThemePreference) -> Result<()> {
        conn.execute(
            "INSERT INTO theme (id, value) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET value = excluded.value",
            rusqlite::params![theme.id, theme.value],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let created_at: String = row.get(3)?;
    let updated_at: Option<String> = row.get(4)?;

    Ok(Document {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_column(3, &created_at)?,
        updated_at: updated_at
            .as_deref()
            .map(|raw| parse_column(4, raw))
            .transpose()?,
    })
}

fn parse_column(idx: usize, raw: &str) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    timestamp::parse(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use markkk_core::ExErrorKind;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_get() {
        let conn = setup();
        let doc = Document::new("# Title", Some("notes"));
        SqliteRepo::insert_document(&conn, &doc).unwrap();

        let loaded = SqliteRepo::get_document(&conn, &doc.id).unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let conn = setup();
        let doc = Document::new("a", None);
        SqliteRepo::insert_document(&conn, &doc).unwrap();

        let err = SqliteRepo::insert_document(&conn, &doc).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
        assert_eq!(err.entity_id(), Some(doc.id.as_str()));
    }

    #[test]
    fn test_put_replaces_whole_record() {
        let conn = setup();
        let mut doc = Document::new("before", Some("first"));
        SqliteRepo::insert_document(&conn, &doc).unwrap();

        doc.name = "second".to_string();
        doc.content = "after".to_string();
        doc.touch();
        SqliteRepo::put_document(&conn, &doc).unwrap();

        let loaded = SqliteRepo::get_document(&conn, &doc.id).unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(SqliteRepo::list_documents(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_put_inserts_unknown_id() {
        let conn = setup();
        let doc = Document::new("fresh", None);
        SqliteRepo::put_document(&conn, &doc).unwrap();
        assert!(SqliteRepo::get_document(&conn, &doc.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_reports_removal() {
        let conn = setup();
        let doc = Document::new("x", None);
        SqliteRepo::insert_document(&conn, &doc).unwrap();

        assert!(SqliteRepo::delete_document(&conn, &doc.id).unwrap());
        assert!(!SqliteRepo::delete_document(&conn, &doc.id).unwrap());
    }

    #[test]
    fn test_corrupt_timestamp_is_serialization_error() {
        let conn = setup();
        conn.execute(
            "INSERT INTO documents (id, name, content, created_at) VALUES ('bad', 'n', 'c', 'not-a-date')",
            [],
        )
        .unwrap();

        let err = SqliteRepo::get_document(&conn, "bad").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }

    #[test]
    fn test_theme_round_trip() {
        let conn = setup();
        assert!(SqliteRepo::get_theme(&conn).unwrap().is_none());

        SqliteRepo::put_theme(&conn, &ThemePreference::selected("light")).unwrap();
        SqliteRepo::put_theme(&conn, &ThemePreference::selected("dark")).unwrap();

        let stored = SqliteRepo::get_theme(&conn).unwrap().unwrap();
        assert_eq!(stored.value, "dark");
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM theme", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}

//! SQLite store handle and schema.

use crate::error::AppError;
use rusqlite::{Connection, DatabaseName, OptionalExtension};
use std::path::{Path, PathBuf};

const PEOPLE_SCHEMA: &str = include_str!("../../schema/people.sql");
const EXPECTED_COLUMNS: &str = "id INTEGER PRIMARY KEY, name TEXT NOT NULL";

/// Open handle to the backing SQLite file.
///
/// The connection is owned by the handle and released on [`Store::close`] or
/// drop. Single-process, single-writer access is assumed: nothing here guards
/// against another process writing the same file.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    conn: Option<Connection>,
}

impl Store {
    /// Open or create the store at `path`, creating missing parent directories.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| unavailable(path, e))?;
            }
        }
        let conn = Connection::open(path).map_err(|e| unavailable(path, e))?;
        prepare_connection(&conn).map_err(|e| match e {
            AppError::StoreUnavailable(msg) => AppError::StoreUnavailable(format!(
                "{}: {}",
                path.display(),
                msg
            )),
            other => other,
        })?;
        log::info!("Opened store at {:?}", path);
        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
        })
    }

    /// Open a throwaway store that lives only as long as the handle.
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        prepare_connection(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Some(conn),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Release the connection. Any later operation, including a second
    /// `close`, fails with `StoreClosed`.
    pub fn close(&mut self) -> Result<(), AppError> {
        let conn = self.conn.take().ok_or(AppError::StoreClosed)?;
        conn.close()
            .map_err(|(_, e)| AppError::StoreUnavailable(e.to_string()))?;
        log::info!("Closed store at {:?}", self.path);
        Ok(())
    }
}

fn unavailable(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::StoreUnavailable(format!("{}: {}", path.display(), e))
}

/// Force the file header to be read, reject read-only files, and make
/// commits durable.
fn prepare_connection(conn: &Connection) -> Result<(), AppError> {
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |r| r.get::<_, i64>(0))?;
    if conn.is_readonly(DatabaseName::Main)? {
        return Err(AppError::StoreUnavailable("store is not writable".into()));
    }
    conn.pragma_update(None, "synchronous", "FULL")?;
    Ok(())
}

/// Borrow the live connection, or `StoreClosed` after `close`.
pub(crate) fn get_connection(store: &Store) -> Result<&Connection, AppError> {
    store.conn.as_ref().ok_or(AppError::StoreClosed)
}

/// Create the `people` table if it is absent and check the shape of an
/// existing one. Returns `true` when the table was created by this call.
pub fn ensure_schema(store: &Store) -> Result<bool, AppError> {
    let conn = get_connection(store)?;
    let tx = conn.unchecked_transaction()?;

    let exists: bool = tx.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE name = 'people' COLLATE NOCASE)",
        [],
        |r| r.get(0),
    )?;
    if !exists {
        tx.execute_batch(PEOPLE_SCHEMA)?;
    }
    validate_people_table(&tx)?;
    tx.commit()?;

    if exists {
        log::debug!("Table people already exists");
    } else {
        log::info!("Created table people in {:?}", store.path);
    }
    Ok(!exists)
}

#[derive(Debug)]
struct ColumnInfo {
    name: String,
    decl_type: String,
    not_null: bool,
    pk: bool,
}

impl ColumnInfo {
    fn is(&self, name: &str, decl_type: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.decl_type.eq_ignore_ascii_case(decl_type)
    }
}

fn validate_people_table(conn: &Connection) -> Result<(), AppError> {
    let sql: Option<String> = conn
        .query_row(
            "SELECT sql FROM sqlite_master \
             WHERE type = 'table' AND name = 'people' COLLATE NOCASE",
            [],
            |r| r.get(0),
        )
        .optional()?;
    let Some(sql) = sql else {
        return Err(AppError::Schema("people exists but is not a table".into()));
    };

    let columns = conn
        .prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info('people') ORDER BY cid",
        )?
        .query_map([], |r| {
            Ok(ColumnInfo {
                name: r.get(0)?,
                decl_type: r.get(1)?,
                not_null: r.get::<_, i32>(2)? != 0,
                pk: r.get::<_, i32>(3)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    match columns.as_slice() {
        [id, name]
            if id.is("id", "INTEGER") && id.pk && name.is("name", "TEXT") && name.not_null => {}
        _ => {
            let found: Vec<String> = columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.decl_type))
                .collect();
            return Err(AppError::Schema(format!(
                "people has unexpected columns ({}), expected ({})",
                found.join(", "),
                EXPECTED_COLUMNS
            )));
        }
    }

    if !sql.to_ascii_uppercase().contains("AUTOINCREMENT") {
        return Err(AppError::Schema("people.id is not declared AUTOINCREMENT".into()));
    }
    Ok(())
}

/// In-memory store with the schema applied, for tests.
pub fn init_test_db() -> Store {
    let store = Store::open_in_memory().expect("open in-memory store");
    ensure_schema(&store).expect("ensure schema");
    store
}

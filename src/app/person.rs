//! Person use cases.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::Store;
use rusqlite::params;
use serde::Serialize;

/// Rows fetched per round trip while iterating a [`PersonList`].
pub const DEFAULT_PAGE_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
}

/// Insert a person and return the id the store assigned to it.
pub fn person_insert(store: &Store, name: &str) -> Result<i64, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("name is required".into()));
    }

    let conn = get_connection(store)?;
    conn.execute("INSERT INTO people (name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    log::info!("Inserted person {} into {:?}", id, store.path());
    Ok(id)
}

/// Take a listing of every person, in ascending id order.
///
/// Nothing is read beyond the snapshot bound here; rows are fetched page by
/// page while the returned list is iterated.
pub fn person_list(store: &Store) -> Result<PersonList<'_>, AppError> {
    let conn = get_connection(store)?;
    let upper_id: i64 = conn.query_row("SELECT COALESCE(MAX(id), 0) FROM people", [], |r| {
        r.get(0)
    })?;
    Ok(PersonList {
        store,
        upper_id,
        page_size: DEFAULT_PAGE_SIZE,
    })
}

/// A listing of the people present when [`person_list`] was called.
///
/// Rows inserted afterwards are never yielded. Every call to [`PersonList::iter`]
/// starts again from the lowest id.
#[derive(Debug, Clone, Copy)]
pub struct PersonList<'s> {
    store: &'s Store,
    upper_id: i64,
    page_size: usize,
}

impl<'s> PersonList<'s> {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Highest id visible to this listing (0 when the store was empty).
    pub fn upper_id(&self) -> i64 {
        self.upper_id
    }

    pub fn iter(&self) -> PersonIter<'s> {
        PersonIter {
            store: self.store,
            upper_id: self.upper_id,
            page_size: self.page_size,
            after_id: 0,
            page: Vec::new().into_iter(),
            exhausted: self.upper_id == 0,
        }
    }

    pub fn to_vec(&self) -> Result<Vec<Person>, AppError> {
        self.iter().collect()
    }
}

impl<'a, 's> IntoIterator for &'a PersonList<'s> {
    type Item = Result<Person, AppError>;
    type IntoIter = PersonIter<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct PersonIter<'s> {
    store: &'s Store,
    upper_id: i64,
    page_size: usize,
    after_id: i64,
    page: std::vec::IntoIter<Person>,
    exhausted: bool,
}

impl PersonIter<'_> {
    fn fetch_page(&self) -> Result<Vec<Person>, AppError> {
        let conn = get_connection(self.store)?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, name FROM people WHERE id > ?1 AND id <= ?2 ORDER BY id LIMIT ?3",
        )?;
        let rows = stmt.query_map(
            params![self.after_id, self.upper_id, self.page_size as i64],
            |row| {
                Ok(Person {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )?;
        let mut out = Vec::with_capacity(self.page_size);
        for r in rows {
            out.push(r?);
        }
        log::debug!("Fetched {} people after id {}", out.len(), self.after_id);
        Ok(out)
    }
}

impl Iterator for PersonIter<'_> {
    type Item = Result<Person, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(person) = self.page.next() {
                self.after_id = person.id;
                return Some(Ok(person));
            }
            if self.exhausted {
                return None;
            }
            match self.fetch_page() {
                Ok(rows) => {
                    if rows.len() < self.page_size {
                        self.exhausted = true;
                    }
                    if rows.is_empty() {
                        return None;
                    }
                    self.page = rows.into_iter();
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

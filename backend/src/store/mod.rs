//! Catalog store - persist books as a JSON file.
//!
//! The import pipeline only needs [`BookStore::insert`]; [`CatalogStore`] is
//! the on-disk implementation the CLI uses, with the rest of the catalog
//! operations (listing, price updates, removal, author search).
//!
//! Books are unique on (title, author, year). Inserting a duplicate is not an
//! error: it is ignored and reported through the `false` return value.

pub mod backup;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::models::Book;

pub use backup::{backup, clean_old_backups, list_backups, BACKUP_PREFIX};

/// Destination for validated books.
pub trait BookStore {
    /// Insert `book`, ignoring its id.
    ///
    /// Returns `true` when the book was added and `false` when a book with
    /// the same title, author and year already exists.
    fn insert(&mut self, book: &Book) -> StoreResult<bool>;
}

/// On-disk layout of the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    /// Next id to hand out; ids are never reused.
    next_id: i64,
    books: Vec<Book>,
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self {
            next_id: 1,
            books: Vec::new(),
        }
    }
}

/// JSON-file catalog. Every mutation is written through to disk.
#[derive(Debug)]
pub struct CatalogStore {
    /// Backing file; `None` keeps the catalog in memory only.
    path: Option<PathBuf>,
    catalog: CatalogFile,
}

impl CatalogStore {
    /// Open the catalog at `path`. A missing or empty file is an empty
    /// catalog.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let catalog = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                CatalogFile::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            CatalogFile::default()
        };

        Ok(Self {
            path: Some(path),
            catalog,
        })
    }

    /// Catalog that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            catalog: CatalogFile::default(),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All books ordered by id.
    pub fn all(&self) -> &[Book] {
        &self.catalog.books
    }

    pub fn len(&self) -> usize {
        self.catalog.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.books.is_empty()
    }

    /// Book with the given id.
    pub fn get(&self, id: i64) -> Option<&Book> {
        self.catalog.books.iter().find(|b| b.id == Some(id))
    }

    /// Books whose author contains `term`, ignoring case, ordered by id.
    pub fn find_by_author(&self, term: &str) -> Vec<&Book> {
        let term = term.trim().to_lowercase();
        self.catalog
            .books
            .iter()
            .filter(|b| b.author.to_lowercase().contains(&term))
            .collect()
    }

    /// Set the price of book `id`. Returns `false` when no such book exists.
    ///
    /// On a failed write the old price is kept.
    pub fn update_price(&mut self, id: i64, price: f64) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut self.catalog.books[index].price, price);
        if let Err(e) = self.persist() {
            self.catalog.books[index].price = previous;
            return Err(e);
        }
        Ok(true)
    }

    /// Delete book `id`. Returns `false` when no such book exists.
    ///
    /// On a failed write the book stays in the catalog.
    pub fn remove(&mut self, id: i64) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let removed = self.catalog.books.remove(index);
        if let Err(e) = self.persist() {
            self.catalog.books.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.catalog.books.iter().position(|b| b.id == Some(id))
    }

    /// Write the catalog to its backing file, creating the directory if
    /// needed.
    fn persist(&self) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.catalog)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl BookStore for CatalogStore {
    fn insert(&mut self, book: &Book) -> StoreResult<bool> {
        if self.catalog.books.iter().any(|b| b.same_identity(book)) {
            return Ok(false);
        }

        let id = self.catalog.next_id;
        self.catalog.next_id += 1;
        self.catalog.books.push(book.clone().with_id(id));
        if let Err(e) = self.persist() {
            self.catalog.books.pop();
            self.catalog.next_id = id;
            return Err(e);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dom_casmurro() -> Book {
        Book::new("Dom Casmurro", "Machado de Assis", 1899, 29.9)
    }

    #[test]
    fn test_insert_assigns_ids() {
        let mut store = CatalogStore::in_memory();
        assert!(store.insert(&dom_casmurro()).unwrap());
        assert!(store.insert(&Book::new("Iracema", "José de Alencar", 1865, 19.9)).unwrap());

        let ids: Vec<_> = store.all().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_duplicate_ignored() {
        let mut store = CatalogStore::in_memory();
        assert!(store.insert(&dom_casmurro()).unwrap());

        let mut cheaper = dom_casmurro();
        cheaper.price = 5.0;
        assert!(!store.insert(&cheaper).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().price, 29.9);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut store = CatalogStore::in_memory();
        store.insert(&dom_casmurro()).unwrap();
        assert!(store.remove(1).unwrap());
        assert!(!store.remove(1).unwrap());

        store.insert(&dom_casmurro()).unwrap();
        assert_eq!(store.all()[0].id, Some(2));
    }

    #[test]
    fn test_update_price() {
        let mut store = CatalogStore::in_memory();
        store.insert(&dom_casmurro()).unwrap();

        assert!(store.update_price(1, 35.0).unwrap());
        assert_eq!(store.get(1).unwrap().price, 35.0);
        assert!(!store.update_price(99, 1.0).unwrap());
    }

    #[test]
    fn test_find_by_author_case_insensitive() {
        let mut store = CatalogStore::in_memory();
        store.insert(&dom_casmurro()).unwrap();
        store.insert(&Book::new("Iracema", "José de Alencar", 1865, 19.9)).unwrap();

        let found = store.find_by_author("machado");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Dom Casmurro");
        assert!(store.find_by_author("Rosa").is_empty());
    }

    #[test]
    fn test_persisted_and_reopened() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("livraria.json");

        let mut store = CatalogStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.insert(&dom_casmurro()).unwrap();
        store.remove(1).unwrap();
        store.insert(&Book::new("Iracema", "José de Alencar", 1865, 19.9)).unwrap();

        let reopened = CatalogStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.all()[0].id, Some(2));
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn test_insert_ignores_given_id() {
        let mut store = CatalogStore::in_memory();
        assert!(store.insert(&dom_casmurro().with_id(42)).unwrap());
        assert_eq!(store.all()[0].id, Some(1));
    }

    #[test]
    fn test_failed_insert_leaves_catalog_unchanged() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("arquivo");
        fs::write(&blocker, "").unwrap();

        let mut store = CatalogStore::open(blocker.join("livraria.json")).unwrap();
        assert!(store.insert(&dom_casmurro()).is_err());
        assert!(store.is_empty());
        assert!(store.insert(&dom_casmurro()).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_write_rolls_back_update_and_remove() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        let mut store = CatalogStore::open(data.join("livraria.json")).unwrap();
        store.insert(&dom_casmurro()).unwrap();

        // A plain file where the data directory was makes every write fail.
        fs::remove_dir_all(&data).unwrap();
        fs::write(&data, "").unwrap();

        assert!(store.update_price(1, 99.0).is_err());
        assert_eq!(store.get(1).unwrap().price, 29.9);
        assert!(store.remove(1).is_err());
        assert_eq!(store.len(), 1);
        assert!(store.insert(&Book::new("Iracema", "José de Alencar", 1865, 19.9)).is_err());

        fs::remove_file(&data).unwrap();
        assert!(store.insert(&Book::new("Iracema", "José de Alencar", 1865, 19.9)).unwrap());
        assert_eq!(store.get(2).unwrap().title, "Iracema");
    }

    #[test]
    fn test_empty_file_is_empty_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("livraria.json");
        fs::write(&path, "").unwrap();
        assert!(CatalogStore::open(&path).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("livraria.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(CatalogStore::open(&path).is_err());
    }
}

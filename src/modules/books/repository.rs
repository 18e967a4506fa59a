//! Book storage.
//!
//! [`BookRepository`] is the seam between the lending service and whatever
//! holds the records. [`InMemoryBookRepository`] backs local and test runs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use super::models::Book;

/// Storage contract for books.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Every stored book.
    async fn get_all(&self) -> anyhow::Result<Vec<Book>>;

    /// The book with `id`, if any.
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Book>>;

    /// Insert-or-update keyed by `book.id`.
    ///
    /// An unseen id is inserted as given. A known id has all mutable fields
    /// overwritten while the stored id is kept. `Ok(None)` means the backend
    /// did not persist anything.
    async fn save(&self, book: Book) -> anyhow::Result<Option<Book>>;
}

#[derive(Debug)]
struct Slot {
    /// First-insertion order, used to keep listing stable
    seq: u64,
    book: Book,
}

/// Concurrent in-memory store keyed by book id.
///
/// Upserts for one id go through the map's entry API, so they are applied
/// whole and in some total order; the last writer wins.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: DashMap<Uuid, Slot>,
    next_seq: AtomicU64,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn get_all(&self) -> anyhow::Result<Vec<Book>> {
        let mut slots: Vec<(u64, Book)> = self
            .books
            .iter()
            .map(|entry| (entry.seq, entry.book.clone()))
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);
        Ok(slots.into_iter().map(|(_, book)| book).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Book>> {
        Ok(self.books.get(&id).map(|slot| slot.book.clone()))
    }

    async fn save(&self, book: Book) -> anyhow::Result<Option<Book>> {
        let saved = match self.books.entry(book.id) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                slot.book.apply_update(&book);
                tracing::debug!(book_id = %book.id, "book updated");
                slot.book.clone()
            }
            Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                let slot = vacant.insert(Slot { seq, book });
                tracing::debug!(book_id = %slot.book.id, "book inserted");
                slot.book.clone()
            }
        };
        Ok(Some(saved))
    }
}

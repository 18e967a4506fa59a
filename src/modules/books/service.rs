use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::Book;
use super::repository::BookRepository;

#[derive(Debug, Error)]
pub enum LendingError {
    /// The repository accepted the call but persisted nothing.
    #[error("{0}")]
    OperationFailed(&'static str),

    #[error("repository error: {0:#}")]
    Repository(#[from] anyhow::Error),
}

/// Checkout and return transitions on top of a [`BookRepository`].
///
/// The service does not refuse to check out a book that is already out;
/// callers check [`LendingService::is_already_checked_out`] first.
#[derive(Clone)]
pub struct LendingService {
    repository: Arc<dyn BookRepository>,
}

impl LendingService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    pub fn is_already_checked_out(book: &Book) -> bool {
        !book.is_available
    }

    pub async fn get_all(&self) -> Result<Vec<Book>, LendingError> {
        Ok(self.repository.get_all().await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Book>, LendingError> {
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Persist a new book; it always enters the catalogue available.
    pub async fn add_book(&self, mut book: Book) -> Result<Book, LendingError> {
        book.is_available = true;
        book.checkout_date = None;
        let saved = self.persist(book, "Failed to save book").await?;
        tracing::info!(book_id = %saved.id, name = %saved.name, "book added");
        Ok(saved)
    }

    /// Mark the book lent out as of now.
    pub async fn checkout(&self, mut book: Book) -> Result<Book, LendingError> {
        book.is_available = false;
        book.checkout_date = Some(OffsetDateTime::now_utc());
        let saved = self.persist(book, "Failed to checkout book").await?;
        tracing::info!(book_id = %saved.id, "book checked out");
        Ok(saved)
    }

    /// Put the book back on the shelf and clear its checkout date.
    pub async fn return_book(&self, mut book: Book) -> Result<Book, LendingError> {
        book.is_available = true;
        book.checkout_date = None;
        let saved = self.persist(book, "Failed to return book").await?;
        tracing::info!(book_id = %saved.id, "book returned");
        Ok(saved)
    }

    async fn persist(&self, book: Book, failure: &'static str) -> Result<Book, LendingError> {
        let book_id = book.id;
        match self.repository.save(book).await? {
            Some(saved) => Ok(saved),
            None => {
                tracing::warn!(%book_id, failure, "repository persisted nothing");
                Err(LendingError::OperationFailed(failure))
            }
        }
    }
}

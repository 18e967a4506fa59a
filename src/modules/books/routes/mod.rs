//! HTTP handlers for the books module.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use lending_http::{ApiResponse, AppError};
use uuid::Uuid;
use validator::Validate;

use super::models::{validation_problems, Book, CreateBook};
use super::service::{LendingError, LendingService};
use super::MODULE_NAME;

/// Router for `/api/books`, bound to the lending service.
pub fn router(service: LendingService) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/health", get(health_check))
        .route("/{id}", get(get_book))
        .route("/{id}/checkout", post(checkout_book))
        .route("/{id}/return", post(return_book))
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// GET /api/books
async fn list_books(
    State(service): State<LendingService>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = service
        .get_all()
        .await
        .map_err(|err| AppError::internal("Failed to retrieve books", err))?;

    Ok(ApiResponse::success(books, "Books retrieved successfully"))
}

/// GET /api/books/{id}
async fn get_book(
    State(service): State<LendingService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let id = book_id(path)?;
    let book = service
        .get_by_id(id)
        .await
        .map_err(|err| AppError::internal("Failed to retrieve book", err))?
        .ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(ApiResponse::success(book, "Book retrieved successfully"))
}

/// POST /api/books
async fn add_book(
    State(service): State<LendingService>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::validation([rejection.body_text()]))?;
    request
        .validate()
        .map_err(|errors| AppError::validation(validation_problems(&errors)))?;

    let existing = service
        .get_by_id(request.id)
        .await
        .map_err(|err| AppError::bad_request("Failed to create book", err))?;
    if existing.is_some() {
        return Err(AppError::conflict(
            "Book Id already available in records. Please provide different Id",
        ));
    }

    let added = service
        .add_book(Book::from(request))
        .await
        .map_err(|err| AppError::bad_request("Failed to create book", err))?;

    let location = format!("/api/{MODULE_NAME}/{}", added.id);
    Ok((
        [(header::LOCATION, location)],
        ApiResponse::created(added, "Book added successfully"),
    ))
}

/// POST /api/books/{id}/checkout
async fn checkout_book(
    State(service): State<LendingService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let id = book_id(path)?;
    let book = service
        .get_by_id(id)
        .await
        .map_err(|err| AppError::bad_request("Failed to checkout book.", err))?
        .ok_or_else(|| {
            AppError::not_found("Book does not exist in records. Please verify Id again.")
        })?;

    // Two requests can both pass this check before either saves.
    if LendingService::is_already_checked_out(&book) {
        return Err(AppError::conflict("Book not available for checkout."));
    }

    let lent = service
        .checkout(book)
        .await
        .map_err(|err| lending_failure(err, "Checkout failed", "Failed to checkout book."))?;

    Ok(ApiResponse::success(lent, "Book checked out successfully."))
}

/// POST /api/books/{id}/return
async fn return_book(
    State(service): State<LendingService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let id = book_id(path)?;
    let book = service
        .get_by_id(id)
        .await
        .map_err(|err| AppError::bad_request("Failed to return book.", err))?
        .ok_or_else(|| {
            AppError::not_found(
                "Book does not exist in records. Please re-try with correct book Id.",
            )
        })?;

    let returned = service
        .return_book(book)
        .await
        .map_err(|err| lending_failure(err, "Return failed.", "Failed to return book."))?;

    Ok(ApiResponse::success(returned, "Book returned successfully."))
}

fn book_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::bad_request("Invalid book id", rejection.body_text()))
}

/// Persistence failures and other service errors carry different summaries.
fn lending_failure(err: LendingError, persist_failed: &str, otherwise: &str) -> AppError {
    if matches!(err, LendingError::OperationFailed(_)) {
        AppError::bad_request(persist_failed, err)
    } else {
        AppError::bad_request(otherwise, err)
    }
}

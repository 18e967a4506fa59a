use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Maximum length of a book name, in characters.
pub const MAX_NAME_LEN: u64 = 500;

/// A book in the lending catalogue.
///
/// `checkout_date` is `Some` exactly when the book is checked out
/// (`is_available == false`) and `None` while it sits on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book, supplied by the caller
    pub id: Uuid,
    /// Title of the book
    pub name: String,
    /// Author of the book
    #[serde(default)]
    pub author: Option<String>,
    /// ISBN-10 or ISBN-13
    #[serde(default)]
    pub isbn: Option<String>,
    /// Publisher of the book
    #[serde(default)]
    pub publisher: Option<String>,
    /// Whether the book can be lent out
    #[serde(default)]
    pub is_available: bool,
    /// When the book was lent out
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub checkout_date: Option<OffsetDateTime>,
}

impl Book {
    /// Copy every mutable field from `other`, leaving `id` untouched.
    pub fn apply_update(&mut self, other: &Book) {
        self.name.clone_from(&other.name);
        self.author.clone_from(&other.author);
        self.isbn.clone_from(&other.isbn);
        self.publisher.clone_from(&other.publisher);
        self.is_available = other.is_available;
        self.checkout_date = other.checkout_date;
    }
}

/// Request model for adding a book to the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    /// Unique identifier for the book
    pub id: Uuid,
    /// Title of the book
    #[validate(length(min = 1, max = MAX_NAME_LEN, message = "name must be between 1 and 500 characters"))]
    pub name: String,
    /// Author of the book
    #[serde(default)]
    pub author: Option<String>,
    /// ISBN-10 or ISBN-13; hyphens and spaces are ignored
    #[serde(default)]
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: Option<String>,
    /// Publisher of the book
    #[serde(default)]
    pub publisher: Option<String>,
}

impl From<CreateBook> for Book {
    fn from(request: CreateBook) -> Self {
        Self {
            id: request.id,
            name: request.name,
            author: request.author,
            isbn: request.isbn,
            publisher: request.publisher,
            is_available: true,
            checkout_date: None,
        }
    }
}

/// Validate an ISBN-10 or ISBN-13, including its check digit.
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    if is_valid_isbn(isbn) {
        Ok(())
    } else {
        let mut error = ValidationError::new("isbn");
        error.message = Some("isbn must be a valid ISBN-10 or ISBN-13".into());
        Err(error)
    }
}

/// Checksum test for ISBN-10 and ISBN-13 after stripping separators.
pub fn is_valid_isbn(isbn: &str) -> bool {
    let chars: Vec<char> = isbn.chars().filter(|c| *c != '-' && *c != ' ').collect();

    match chars.len() {
        10 => {
            let mut sum = 0u32;
            for (idx, c) in chars.iter().enumerate() {
                let weight = 10 - idx as u32;
                let value = match (c, idx) {
                    ('X' | 'x', 9) => 10,
                    _ => match c.to_digit(10) {
                        Some(d) => d,
                        None => return false,
                    },
                };
                sum += value * weight;
            }
            sum % 11 == 0
        }
        13 => {
            let mut sum = 0u32;
            for (idx, c) in chars.iter().enumerate() {
                let Some(d) = c.to_digit(10) else {
                    return false;
                };
                sum += if idx % 2 == 0 { d } else { d * 3 };
            }
            sum % 10 == 0
        }
        _ => false,
    }
}

/// Flatten validator output into `field: message` strings.
pub fn validation_problems(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut problems: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    problems.sort();
    problems
}

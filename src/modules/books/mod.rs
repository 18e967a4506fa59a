pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use lending_kernel::{InitCtx, Module};
use serde_json::json;
use validator::Validate;

use models::{validation_problems, Book, CreateBook, MAX_NAME_LEN};
use repository::BookRepository;
use service::LendingService;

/// Mount name; routes live under `/api/books`.
pub const MODULE_NAME: &str = "books";

/// Books module: catalogue plus checkout and return.
pub struct BooksModule {
    service: LendingService,
}

impl BooksModule {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self {
            service: LendingService::new(repository),
        }
    }

    /// Add every book listed in a JSON seed file, skipping ids already stored.
    async fn seed_from(&self, path: &Path) -> anyhow::Result<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let requests: Vec<CreateBook> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        let mut added = 0;
        for request in requests {
            if let Err(errors) = request.validate() {
                anyhow::bail!(
                    "seed book {} is invalid: {}",
                    request.id,
                    validation_problems(&errors).join("; ")
                );
            }
            if self.service.get_by_id(request.id).await?.is_some() {
                tracing::debug!(book_id = %request.id, "seed book already present");
                continue;
            }
            self.service.add_book(Book::from(request)).await?;
            added += 1;
        }
        Ok(added)
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if let Some(seed_file) = &ctx.settings.books.seed_file {
            let added = self.seed_from(seed_file).await?;
            tracing::info!(
                module = self.name(),
                seed_file = %seed_file.display(),
                added,
                "books seeded"
            );
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(repository: Arc<dyn BookRepository>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repository))
}

fn envelope(description: &str, data_schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "allOf": [
                        { "$ref": "#/components/schemas/ApiResponse" },
                        { "type": "object", "properties": { "data": data_schema } }
                    ]
                }
            }
        }
    })
}

fn failure(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ApiResponse" }
            }
        }
    })
}

fn id_parameter() -> serde_json::Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book ID",
        "schema": { "type": "string", "format": "uuid" }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book = json!({ "$ref": "#/components/schemas/Book" });
    let books = json!({ "type": "array", "items": book.clone() });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "Get all books",
                    "tags": ["Books"],
                    "responses": {
                        "200": envelope("Books retrieved successfully", books),
                        "500": failure("Internal server error")
                    }
                },
                "post": {
                    "summary": "Add a new book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": envelope("Book added successfully", book.clone()),
                        "400": failure("Bad request")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book by ID",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": envelope("Book retrieved successfully", book.clone()),
                        "404": failure("Book not found"),
                        "500": failure("Internal server error")
                    }
                }
            },
            "/{id}/checkout": {
                "post": {
                    "summary": "Check out a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": envelope("Book checked out successfully", book.clone()),
                        "400": failure("Book not available for checkout"),
                        "404": failure("Book not found")
                    }
                }
            },
            "/{id}/return": {
                "post": {
                    "summary": "Return a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": envelope("Book returned successfully", book),
                        "400": failure("Return failed"),
                        "404": failure("Book not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "name": { "type": "string", "minLength": 1, "maxLength": MAX_NAME_LEN },
                        "author": { "type": ["string", "null"] },
                        "isbn": { "type": ["string", "null"] },
                        "publisher": { "type": ["string", "null"] },
                        "isAvailable": { "type": "boolean" },
                        "checkoutDate": { "type": ["string", "null"], "format": "date-time" }
                    },
                    "required": ["id", "name", "isAvailable"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "name": { "type": "string", "minLength": 1, "maxLength": MAX_NAME_LEN },
                        "author": { "type": "string" },
                        "isbn": { "type": "string", "description": "ISBN-10 or ISBN-13" },
                        "publisher": { "type": "string" }
                    },
                    "required": ["id", "name"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lending_kernel::settings::Settings;
    use repository::InMemoryBookRepository;

    fn seed_path(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("books-seed-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn init_seeds_books_once() {
        let repo = Arc::new(InMemoryBookRepository::new());
        let module = BooksModule::new(repo.clone());
        let path = seed_path(
            r#"[
                {"id": "6f1c2d4e-8a3b-4c5d-9e0f-112233445566", "name": "Dune", "isbn": "9780441013593"},
                {"id": "7a2b3c4d-5e6f-4a8b-9c0d-aabbccddeeff", "name": "Solaris"}
            ]"#,
        );
        let mut settings = Settings::default();
        settings.books.seed_file = Some(path.clone());
        let ctx = InitCtx {
            settings: &settings,
        };

        module.init(&ctx).await.unwrap();
        module.init(&ctx).await.unwrap();

        let books = repo.get_all().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].name, "Dune");
        assert!(books.iter().all(|b| b.is_available));
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn init_rejects_invalid_seed_book() {
        let module = BooksModule::new(Arc::new(InMemoryBookRepository::new()));
        let path = seed_path(r#"[{"id": "6f1c2d4e-8a3b-4c5d-9e0f-112233445566", "name": ""}]"#);
        let mut settings = Settings::default();
        settings.books.seed_file = Some(path.clone());
        let ctx = InitCtx {
            settings: &settings,
        };

        let err = module.init(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("is invalid"));
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn init_reports_missing_seed_file() {
        let module = BooksModule::new(Arc::new(InMemoryBookRepository::new()));
        let mut settings = Settings::default();
        settings.books.seed_file = Some("/nonexistent/books.json".into());
        let ctx = InitCtx {
            settings: &settings,
        };

        let err = module.init(&ctx).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to read seed file"));
    }

    #[test]
    fn openapi_fragment_declares_schemas() {
        let spec = openapi_fragment();
        assert!(spec["components"]["schemas"]["Book"].is_object());
        assert!(spec["paths"]["/{id}/checkout"]["post"].is_object());
        assert_eq!(
            spec["components"]["schemas"]["CreateBook"]["properties"]["name"]["maxLength"],
            MAX_NAME_LEN
        );
        assert_eq!(
            spec["components"]["schemas"]["Book"]["properties"]["checkoutDate"]["type"],
            json!(["string", "null"])
        );
    }
}

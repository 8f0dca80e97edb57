//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that validate
//! a storage backend through full REST round-trips:
//! JSON → HTTP request → handler → CrudService → DataService → HTTP response → JSON.

/// Generate a REST integration test suite for a storage backend.
///
/// `$factory` must produce a `(users, notes)` tuple of storage services.
///
/// # Generated Tests
///
/// ## CRUD
/// - `test_rest_create_user` - POST 201 + message and id
/// - `test_rest_list_users` - GET 200 + `{ "users": [...] }`
/// - `test_rest_update_user` - PATCH 200 + "User Updated"
/// - `test_rest_delete_note` - DELETE 200, record gone from the list
/// - `test_rest_update_note_message` - PATCH on notes says "Note Updated"
/// - `test_rest_update_unchanged` - PATCH with the stored values is still 200
///
/// ## Validation and conflicts
/// - `test_rest_create_missing_fields` - 400
/// - `test_rest_create_invalid_email` - 400
/// - `test_rest_create_duplicate_user` - 400, no new record
/// - `test_rest_create_duplicate_note` - 400
/// - `test_rest_update_taken_email` - 400
/// - `test_rest_update_empty_body` - 400 for no body and `{}`
/// - `test_rest_update_unknown_fields` - 400
/// - `test_rest_update_blank_field` - 400, stored value kept
/// - `test_rest_create_from_array_rejected` - 400 for a JSON array body
///
/// ## Identifiers
/// - `test_rest_update_nonexistent` - 404 for both entities
/// - `test_rest_delete_nonexistent` - 404
/// - `test_rest_invalid_id` - 400 on document stores, 404 elsewhere, never 500
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use autostack::core::service::DataService;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use serde_json::{Value, json};

            /// Server plus the backend it runs on
            async fn make_server() -> (TestServer, autostack::config::Backend) {
                let (users, notes) = $factory;
                let backend = users.backend();
                (
                    storage_harness::integration::build_test_server(users, notes),
                    backend,
                )
            }

            async fn create_user(server: &TestServer, username: &str, email: &str) -> Value {
                let response = server
                    .post("/create-user")
                    .json(&json!({ "username": username, "email": email }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json::<Value>()["id"].clone()
            }

            async fn create_note(server: &TestServer, title: &str, content: &str) -> Value {
                let response = server
                    .post("/create-note")
                    .json(&json!({ "title": title, "content": content }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json::<Value>()["id"].clone()
            }

            fn id_segment(id: &Value) -> String {
                match id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }
            }

            // ==============================================================
            // CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create_user() {
                let (server, _) = make_server().await;

                let response = server
                    .post("/create-user")
                    .json(&json!({ "username": "alice", "email": "alice@test.com" }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["message"], "New User Created");
                assert!(!body["id"].is_null(), "Created id should be returned");
            }

            #[tokio::test]
            async fn test_rest_list_users() {
                let (server, _) = make_server().await;

                for name in ["alpha", "beta", "gamma"] {
                    create_user(&server, name, &format!("{}@test.com", name)).await;
                }

                let response = server.get("/get-users").await;
                response.assert_status_ok();

                let body: Value = response.json();
                let users = body["users"].as_array().expect("users array");
                assert_eq!(users.len(), 3);
                assert!(users.iter().any(|u| u["username"] == "beta" && u["email"] == "beta@test.com"));
                assert!(users.iter().all(|u| !u["id"].is_null()));
            }

            #[tokio::test]
            async fn test_rest_update_user() {
                let (server, _) = make_server().await;
                let id = create_user(&server, "alice", "alice@test.com").await;

                let response = server
                    .patch(&format!("/update-users/{}", id_segment(&id)))
                    .json(&json!({ "email": "alice@example.org" }))
                    .await;

                response.assert_status_ok();
                response.assert_json(&json!({ "message": "User Updated" }));

                let body: Value = server.get("/get-users").await.json();
                assert_eq!(body["users"][0]["username"], "alice");
                assert_eq!(body["users"][0]["email"], "alice@example.org");
            }

            #[tokio::test]
            async fn test_rest_update_note_message() {
                let (server, _) = make_server().await;
                let id = create_note(&server, "groceries", "milk").await;

                let response = server
                    .patch(&format!("/update-notes/{}", id_segment(&id)))
                    .json(&json!({ "content": "milk, eggs" }))
                    .await;

                response.assert_status_ok();
                response.assert_json(&json!({ "message": "Note Updated" }));
            }

            #[tokio::test]
            async fn test_rest_update_unchanged() {
                let (server, _) = make_server().await;
                let id = create_user(&server, "alice", "alice@test.com").await;

                let response = server
                    .patch(&format!("/update-users/{}", id_segment(&id)))
                    .json(&json!({ "username": "alice", "email": "alice@test.com" }))
                    .await;

                response.assert_status_ok();
                response.assert_json(&json!({ "message": "User Updated" }));
            }

            #[tokio::test]
            async fn test_rest_delete_note() {
                let (server, _) = make_server().await;
                let keep = create_note(&server, "keep", "stays").await;
                let drop = create_note(&server, "drop", "goes").await;

                let response = server
                    .delete(&format!("/delete-note/{}", id_segment(&drop)))
                    .await;
                response.assert_status_ok();
                response.assert_json(&json!({ "message": "Note Deleted" }));

                let body: Value = server.get("/get-notes").await.json();
                let notes = body["notes"].as_array().expect("notes array");
                assert_eq!(notes.len(), 1);
                assert_eq!(notes[0]["id"], keep);
            }

            // ==============================================================
            // Validation and conflicts
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create_missing_fields() {
                let (server, _) = make_server().await;

                let response = server
                    .post("/create-user")
                    .json(&json!({ "username": "alice" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "MISSING_FIELDS");

                let response = server
                    .post("/create-note")
                    .json(&json!({ "title": "", "content": "x" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_create_invalid_email() {
                let (server, _) = make_server().await;

                let response = server
                    .post("/create-user")
                    .json(&json!({ "username": "alice", "email": "not-an-email" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = server.get("/get-users").await.json();
                assert!(body["users"].as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_rest_create_duplicate_user() {
                let (server, _) = make_server().await;
                create_user(&server, "alice", "alice@test.com").await;

                for body in [
                    json!({ "username": "alice", "email": "other@test.com" }),
                    json!({ "username": "bob", "email": "alice@test.com" }),
                ] {
                    let response = server.post("/create-user").json(&body).await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    let body: Value = response.json();
                    assert_eq!(body["message"], "User with same username or email already exists");
                }

                let body: Value = server.get("/get-users").await.json();
                assert_eq!(body["users"].as_array().unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_rest_create_duplicate_note() {
                let (server, _) = make_server().await;
                create_note(&server, "todo", "first").await;

                let response = server
                    .post("/create-note")
                    .json(&json!({ "title": "todo", "content": "second" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["message"], "Note with same title already exists");
            }

            #[tokio::test]
            async fn test_rest_update_taken_email() {
                let (server, _) = make_server().await;
                create_user(&server, "alice", "alice@test.com").await;
                let bob = create_user(&server, "bob", "bob@test.com").await;

                let response = server
                    .patch(&format!("/update-users/{}", id_segment(&bob)))
                    .json(&json!({ "email": "alice@test.com" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_update_empty_body() {
                let (server, _) = make_server().await;
                let id = create_user(&server, "alice", "alice@test.com").await;
                let path = format!("/update-users/{}", id_segment(&id));

                let response = server.patch(&path).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["message"], "No data provided");

                let response = server.patch(&path).json(&json!({})).await;
                response.assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_update_unknown_fields() {
                let (server, _) = make_server().await;
                let id = create_note(&server, "groceries", "milk").await;

                let response = server
                    .patch(&format!("/update-notes/{}", id_segment(&id)))
                    .json(&json!({ "colour": "red" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["message"], "No valid fields to update");
            }

            #[tokio::test]
            async fn test_rest_update_blank_field() {
                let (server, _) = make_server().await;
                let id = create_note(&server, "groceries", "milk").await;

                let response = server
                    .patch(&format!("/update-notes/{}", id_segment(&id)))
                    .json(&json!({ "title": "   " }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "MISSING_FIELDS");

                let body: Value = server.get("/get-notes").await.json();
                assert_eq!(body["notes"][0]["title"], "groceries");
            }

            #[tokio::test]
            async fn test_rest_create_from_array_rejected() {
                let (server, _) = make_server().await;

                let response = server
                    .post("/create-user")
                    .json(&json!(["alice", "alice@test.com"]))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_JSON");

                let body: Value = server.get("/get-users").await.json();
                assert!(body["users"].as_array().unwrap().is_empty());
            }

            // ==============================================================
            // Identifiers
            // ==============================================================

            #[tokio::test]
            async fn test_rest_update_nonexistent() {
                let (server, backend) = make_server().await;
                let missing = missing_id(backend);

                let response = server
                    .patch(&format!("/update-users/{}", missing))
                    .json(&json!({ "username": "ghost" }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);

                let response = server
                    .patch(&format!("/update-notes/{}", missing))
                    .json(&json!({ "title": "ghost" }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_delete_nonexistent() {
                let (server, backend) = make_server().await;

                let response = server
                    .delete(&format!("/delete-user/{}", missing_id(backend)))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["message"], "User not found");
            }

            #[tokio::test]
            async fn test_rest_invalid_id() {
                let (server, backend) = make_server().await;
                let expected = if backend.is_document_store() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::NOT_FOUND
                };

                let response = server
                    .patch(&format!("/update-users/{}", INVALID_ID))
                    .json(&json!({ "username": "x" }))
                    .await;
                response.assert_status(expected);

                let response = server.delete(&format!("/delete-note/{}", INVALID_ID)).await;
                response.assert_status(expected);
                if backend.is_document_store() {
                    let body: Value = response.json();
                    assert_eq!(body["message"], "Invalid note id");
                }
            }
        }
    };
}

//! Integration test infrastructure for storage backends.
//!
//! Builds the real application router on top of a pair of storage services
//! so the REST suite exercises the full stack:
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by ServerBuilder)
//!         ├─ GET    /get-users, /get-notes
//!         ├─ POST   /create-user, /create-note
//!         ├─ PATCH  /update-users/{id}, /update-notes/{id}
//!         └─ DELETE /delete-user/{id}, /delete-note/{id}
//! ```

#[macro_use]
pub mod rest_tests;

use autostack::core::service::DataService;
use autostack::entities::{Note, User};
use autostack::server::ServerBuilder;
use axum_test::TestServer;

/// Build a test server for the given storage services.
///
/// # Usage
/// ```rust,ignore
/// let server = build_test_server(
///     InMemoryDataService::<User>::new(),
///     InMemoryDataService::<Note>::new(),
/// );
/// ```
pub fn build_test_server(
    users: impl DataService<User> + 'static,
    notes: impl DataService<Note> + 'static,
) -> TestServer {
    let router = ServerBuilder::new()
        .with_user_service(users)
        .with_note_service(notes)
        .build()
        .expect("router should build with both services");
    TestServer::try_new(router).expect("Failed to create test server")
}

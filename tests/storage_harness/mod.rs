//! Shared test harness for storage backend testing
//!
//! Provides field builders for users and notes, backend-aware identifiers
//! for the not-found and invalid-id cases, and the two conformance macros:
//!
//! - `data_service_tests!` checks the `DataService<E>` contract
//! - `rest_integration_tests!` checks the HTTP contract through `axum-test`
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! data_service_tests!((InMemoryDataService::<User>::new(), InMemoryDataService::<Note>::new()));
//! ```
//!
//! Each factory expression yields a `(users, notes)` pair of services and is
//! re-evaluated for every test.

#![allow(dead_code)]

#[macro_use]
pub mod integration;

use autostack::config::Backend;
use autostack::core::entity::FieldSet;

/// Identifier that parses on `backend` but matches no record
pub fn missing_id(backend: Backend) -> &'static str {
    if backend.is_document_store() {
        "65f0aa11bb22cc33dd44ee55"
    } else {
        "99999"
    }
}

/// Identifier that no backend can parse
pub const INVALID_ID: &str = "not-an-id";

pub fn user_fields(username: &str, email: &str) -> FieldSet {
    let mut fields = FieldSet::new();
    fields.insert("username", username.to_string());
    fields.insert("email", email.to_string());
    fields
}

pub fn note_fields(title: &str, content: &str) -> FieldSet {
    let mut fields = FieldSet::new();
    fields.insert("title", title.to_string());
    fields.insert("content", content.to_string());
    fields
}

/// Build `count` distinct user field sets
pub fn sample_users(count: usize) -> Vec<FieldSet> {
    (0..count)
        .map(|i| user_fields(&format!("user_{}", i), &format!("user_{}@test.com", i)))
        .collect()
}

//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(any(feature = "postgres", feature = "mysql"))]
pub(crate) mod sql;

pub use in_memory::InMemoryDataService;
#[cfg(feature = "mongodb_backend")]
pub use self::mongodb::MongoDataService;
#[cfg(feature = "mysql")]
pub use mysql::MysqlDataService;
#[cfg(feature = "postgres")]
pub use postgres::PostgresDataService;

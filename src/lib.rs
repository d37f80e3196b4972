//! Connection wrapper for MongoDB deployments without authentication.
//!
//! String-valued [`MongoProperties`] are validated once into a
//! [`ConnectionConfig`], which [`NoAuthClientWrapper`] turns into a live
//! driver client exposing a few administrative queries.

#[macro_use]
extern crate log;

pub mod connection;
pub mod utils;
pub mod wrapper;

pub use connection::{ConnectionConfig, MongoProp, MongoProperties};
pub use utils::error::{MongoDbError, MongoResult};
pub use wrapper::{MissingCollection, MongoCollectionWrapper, NoAuthClientWrapper};

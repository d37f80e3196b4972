use std::num::ParseIntError;
use thiserror::Error;

use crate::connection::MongoProp;

pub type MongoResult<T> = Result<T, MongoDbError>;

/// The one error kind surfaced by the wrapper. Driver failures are converted
/// through `?`; values already of this type pass through unchanged.
#[derive(Error, Debug)]
pub enum MongoDbError {
  #[error("empty hosts string, at least one host is required")]
  EmptyHosts,
  #[error("malformed host ({0})")]
  MalformedHost(String),
  #[error("unable to parse port number ({0}). Err = {1}")]
  MalformedPort(String, ParseIntError),
  #[error("unable to parse {0} value ({1}). Err = {2}")]
  InvalidNumber(MongoProp, String, ParseIntError),
  #[error("negative write concern acknowledgement count ({0})")]
  InvalidWriteConcern(String),
  #[error("unknown read preference ({0})")]
  UnknownReadPreference(String),
  #[error("malformed read preference tag set ({0}). Err = {1}")]
  MalformedTagSet(String, serde_json::Error),
  #[error("no database name specified")]
  MissingDatabaseName,
  #[error("no collection specified")]
  MissingCollectionName,
  #[error("collection {1} does not exist in database {0}")]
  CollectionNotFound(String, String),
  #[error("unable to get index info for collection {0}")]
  NoIndexInfo(String),
  #[error("connection has already been closed")]
  ConnectionClosed,
  #[error("bson serialization error. Err = {0}")]
  Serialization(#[from] mongodb::bson::ser::Error),
  #[error("mongodb driver error. Err = {0}")]
  Driver(#[from] mongodb::error::Error),
}

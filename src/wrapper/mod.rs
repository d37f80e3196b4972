use mongodb::{
  bson::{doc, Document},
  options::TagSet,
  Client, Database,
};
use std::collections::BTreeSet;

use crate::{
  connection::{ConnectionConfig, MongoProperties},
  utils::{
    constants::{LOCAL_DB, REPL_SET_COLLECTION},
    error::{MongoDbError, MongoResult},
  },
};

pub mod collection;
pub mod replset;

pub use collection::MongoCollectionWrapper;

/// What `get_index_info` does when the collection does not exist yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingCollection {
  #[default]
  Fail,
  Create,
}

/// Connection wrapper for deployments without authentication.
///
/// Owns the driver client until [`dispose`](Self::dispose) is called; every
/// operation after that fails with [`MongoDbError::ConnectionClosed`].
#[derive(Debug)]
pub struct NoAuthClientWrapper {
  client: Option<Client>,
}

impl NoAuthClientWrapper {
  pub async fn new(props: &MongoProperties) -> MongoResult<Self> {
    let config = ConnectionConfig::from_properties(props)?;
    Self::from_config(&config).await
  }

  pub async fn from_config(config: &ConnectionConfig) -> MongoResult<Self> {
    let client = Client::with_options(config.client_options().await?)?;
    info!("Initialized MongoDB client for {} host(s)", config.endpoints().len());
    Ok(Self::with_client(client))
  }

  pub fn with_client(client: Client) -> Self {
    Self { client: Some(client) }
  }

  pub fn client(&self) -> MongoResult<&Client> {
    self.client.as_ref().ok_or(MongoDbError::ConnectionClosed)
  }

  fn database(&self, name: &str) -> MongoResult<Database> {
    if name.trim().is_empty() {
      return Err(MongoDbError::MissingDatabaseName);
    }
    Ok(self.client()?.database(name))
  }

  pub async fn list_database_names(&self) -> MongoResult<Vec<String>> {
    Ok(self.client()?.list_database_names(None, None).await?)
  }

  pub async fn list_collection_names(&self, db: &str) -> MongoResult<BTreeSet<String>> {
    let names = self.database(db)?.list_collection_names(None).await?;
    Ok(names.into_iter().collect())
  }

  /// Custom write concern modes defined in the replica set config. These are
  /// valid `w` values next to a node count or "majority".
  pub async fn get_last_error_modes(&self) -> MongoResult<Vec<String>> {
    let config = self.replica_set_config().await?;
    Ok(replset::extract_last_error_modes(config.as_ref()))
  }

  /// Index definitions of `db.collection`, each rendered as a string.
  pub async fn get_index_info(&self, db: &str, collection: &str, on_missing: MissingCollection) -> MongoResult<Vec<String>> {
    self.index_info(db, collection, on_missing).await.map_err(|e| {
      error!("Unable to get index info for {}.{}. Err = {}", db, collection, e);
      e
    })
  }

  async fn index_info(&self, db: &str, collection: &str, on_missing: MissingCollection) -> MongoResult<Vec<String>> {
    let database = self.database(db)?;
    if collection.trim().is_empty() {
      return Err(MongoDbError::MissingCollectionName);
    }

    if !collection_exists(&database, collection).await? {
      match on_missing {
        MissingCollection::Fail => return Err(MongoDbError::CollectionNotFound(db.to_string(), collection.to_string())),
        MissingCollection::Create => {
          info!("Creating missing collection {}.{}", db, collection);
          database.create_collection(collection, None).await?;
        }
      }
    }

    let indexes = MongoCollectionWrapper::new(database.collection(collection)).index_info().await?;
    if indexes.is_empty() {
      return Err(MongoDbError::NoIndexInfo(collection.to_string()));
    }
    Ok(indexes.iter().map(Document::to_string).collect())
  }

  /// All replica set member tags as `"name" : "value"` pairs. Empty when the
  /// deployment is not a replica set.
  pub async fn get_all_tags(&self) -> MongoResult<BTreeSet<String>> {
    let members = self.replica_set_members().await?;
    Ok(replset::collect_all_tags(&members))
  }

  /// Members whose tags satisfy at least one of `tag_sets`, rendered as strings.
  pub async fn get_replica_set_members_that_satisfy_tag_sets(&self, tag_sets: &[TagSet]) -> MongoResult<Vec<String>> {
    let members = self.replica_set_members().await?;
    let satisfying = replset::members_satisfying_tag_sets(tag_sets, &members);
    debug!("{} of {} replica set members satisfy the tag sets", satisfying.len(), members.len());
    Ok(satisfying.into_iter().map(Document::to_string).collect())
  }

  pub fn get_collection(&self, db: &str, name: &str) -> MongoResult<MongoCollectionWrapper> {
    Ok(MongoCollectionWrapper::new(self.database(db)?.collection(name)))
  }

  pub async fn create_collection(&self, db: &str, name: &str) -> MongoResult<MongoCollectionWrapper> {
    let database = self.database(db)?;
    database.create_collection(name, None).await?;
    Ok(MongoCollectionWrapper::new(database.collection(name)))
  }

  /// Shuts the client down. Calling it again fails.
  pub async fn dispose(&mut self) -> MongoResult<()> {
    let client = self.client.take().ok_or(MongoDbError::ConnectionClosed)?;
    client.shutdown().await;
    info!("MongoDB client closed");
    Ok(())
  }

  async fn replica_set_config(&self) -> MongoResult<Option<Document>> {
    let replset = self.database(LOCAL_DB)?.collection::<Document>(REPL_SET_COLLECTION);
    Ok(replset.find_one(None, None).await?)
  }

  async fn replica_set_members(&self) -> MongoResult<Vec<Document>> {
    let config = self.replica_set_config().await?;
    Ok(replset::member_records(config))
  }
}

async fn collection_exists(database: &Database, name: &str) -> MongoResult<bool> {
  let names = database.list_collection_names(doc! { "name": name }).await?;
  Ok(!names.is_empty())
}

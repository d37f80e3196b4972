use mongodb::{
  bson::{self, Document},
  options::UpdateModifications,
  Collection, Cursor, IndexModel,
};
use serde::de::DeserializeOwned;
use tokio_stream::StreamExt;

use crate::utils::error::MongoResult;

/// Collection handle handed out by the client wrapper.
#[derive(Clone, Debug)]
pub struct MongoCollectionWrapper {
  collection: Collection<Document>,
}

impl MongoCollectionWrapper {
  pub fn new(collection: Collection<Document>) -> Self {
    Self { collection }
  }

  pub fn name(&self) -> &str {
    self.collection.name()
  }

  pub fn namespace(&self) -> String {
    self.collection.namespace().to_string()
  }

  pub async fn find_one(&self, filter: Option<Document>) -> MongoResult<Option<Document>> {
    Ok(self.collection.find_one(filter, None).await?)
  }

  pub async fn find(&self, filter: Option<Document>) -> MongoResult<Vec<Document>> {
    let cursor = self.collection.find(filter, None).await?;
    drain(cursor).await
  }

  pub async fn count(&self, filter: Option<Document>) -> MongoResult<u64> {
    Ok(self.collection.count_documents(filter, None).await?)
  }

  pub async fn insert(&self, docs: Vec<Document>) -> MongoResult<usize> {
    let result = self.collection.insert_many(docs, None).await?;
    Ok(result.inserted_ids.len())
  }

  /// Applies `update` to every matching document, returning the modified count.
  pub async fn update(&self, filter: Document, update: impl Into<UpdateModifications>) -> MongoResult<u64> {
    let result = self.collection.update_many(filter, update, None).await?;
    Ok(result.modified_count)
  }

  pub async fn remove(&self, filter: Document) -> MongoResult<u64> {
    let result = self.collection.delete_many(filter, None).await?;
    Ok(result.deleted_count)
  }

  pub async fn aggregate(&self, pipeline: Vec<Document>) -> MongoResult<Vec<Document>> {
    let cursor = self.collection.aggregate(pipeline, None).await?;
    drain(cursor).await
  }

  /// Index definitions as the server reports them (`key`, `name`, ...).
  pub async fn index_info(&self) -> MongoResult<Vec<Document>> {
    let mut cursor = self.collection.list_indexes(None).await?;
    let mut indexes = Vec::new();
    while let Some(index) = cursor.next().await {
      indexes.push(bson::to_document(&index?)?);
    }
    Ok(indexes)
  }

  /// Returns the name the server gave the index.
  pub async fn create_index(&self, keys: Document) -> MongoResult<String> {
    let model = IndexModel::builder().keys(keys).build();
    let result = self.collection.create_index(model, None).await?;
    debug!("Created index {} on {}", result.index_name, self.namespace());
    Ok(result.index_name)
  }

  pub async fn drop_index(&self, name: &str) -> MongoResult<()> {
    self.collection.drop_index(name, None).await?;
    Ok(())
  }

  pub async fn drop(&self) -> MongoResult<()> {
    self.collection.drop(None).await?;
    Ok(())
  }
}

async fn drain<T>(mut cursor: Cursor<T>) -> MongoResult<Vec<T>>
where
  T: DeserializeOwned + Unpin + Send + Sync,
{
  let mut docs = Vec::new();
  while let Some(doc) = cursor.next().await {
    docs.push(doc?);
  }
  Ok(docs)
}

#[cfg(test)]
mod tests {
  use super::*;
  use mongodb::{bson::doc, Client};

  async fn test_collection(name: &str) -> MongoCollectionWrapper {
    let host = std::env::var("MONGODB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let client = Client::with_uri_str(format!("mongodb://{}:27017", host)).await.unwrap();
    let collection = MongoCollectionWrapper::new(client.database("mongo_wrapper_test").collection(name));
    collection.drop().await.unwrap();
    collection
  }

  #[tokio::test]
  #[ignore] // Requires actual MongoDB
  async fn test_crud_round() {
    let collection = test_collection("crud").await;
    assert_eq!(collection.name(), "crud");

    let inserted = collection
      .insert(vec![doc! { "item": "a", "qty": 1 }, doc! { "item": "b", "qty": 5 }])
      .await
      .unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(collection.count(None).await.unwrap(), 2);

    let modified = collection.update(doc! { "item": "a" }, doc! { "$set": { "qty": 2 } }).await.unwrap();
    assert_eq!(modified, 1);
    let found = collection.find_one(Some(doc! { "item": "a" })).await.unwrap().unwrap();
    assert_eq!(found.get_i32("qty").unwrap(), 2);

    let big = collection.aggregate(vec![doc! { "$match": { "qty": { "$gt": 3 } } }]).await.unwrap();
    assert_eq!(big.len(), 1);

    assert_eq!(collection.remove(doc! { "item": "b" }).await.unwrap(), 1);
    assert_eq!(collection.find(None).await.unwrap().len(), 1);
  }

  #[tokio::test]
  #[ignore] // Requires actual MongoDB
  async fn test_index_lifecycle() {
    let collection = test_collection("indexes").await;
    collection.insert(vec![doc! { "item": "a" }]).await.unwrap();

    let name = collection.create_index(doc! { "item": 1 }).await.unwrap();
    let names: Vec<String> = collection
      .index_info()
      .await
      .unwrap()
      .iter()
      .filter_map(|index| index.get_str("name").ok().map(str::to_string))
      .collect();
    assert!(names.contains(&name));

    collection.drop_index(&name).await.unwrap();
    assert_eq!(collection.index_info().await.unwrap().len(), 1);
  }
}

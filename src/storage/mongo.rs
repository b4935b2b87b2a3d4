// MongoDB backend: thin pass-through to the `users` collection.
// Ids cross the boundary as ObjectId hex strings.

use super::{StorageError, StorageResult, UserStore};
use crate::database::MongoDB;
use crate::models::{User, UserDocument};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<UserDocument>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self::from_collection(db.collection::<UserDocument>(USERS_COLLECTION))
    }

    pub fn from_collection(collection: Collection<UserDocument>) -> Self {
        Self { collection }
    }
}

/// Decodes a hex id; a malformed id is a caller error, not a missing record.
fn parse_object_id(id: &str) -> StorageResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StorageError::InvalidArgument("Invalid user ID".to_string()))
}

#[async_trait]
impl UserStore for MongoUserStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn list(&self) -> StorageResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn get(&self, id: &str) -> StorageResult<User> {
        let object_id = parse_object_id(id)?;

        self.collection
            .find_one(doc! { "_id": object_id })
            .await?
            .map(User::from)
            .ok_or(StorageError::NotFound)
    }

    async fn create(&self, user: User) -> StorageResult<String> {
        let result = self.collection.insert_one(UserDocument::from(&user)).await?;

        let object_id = result.inserted_id.as_object_id().ok_or_else(|| {
            StorageError::UnexpectedResponse(format!(
                "inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })?;

        Ok(object_id.to_hex())
    }

    async fn update(&self, id: &str, user: User) -> StorageResult<()> {
        let object_id = parse_object_id(id)?;

        let result = self
            .collection
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": { "name": user.name.as_str(), "email": user.email.as_str() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let object_id = parse_object_id(id)?;

        let result = self.collection.delete_one(doc! { "_id": object_id }).await?;

        if result.deleted_count == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    // The driver connects lazily, so a store over an unreachable server is
    // enough to exercise the id checks that happen before any round trip.
    async fn offline_store() -> MongoUserStore {
        let client = Client::with_uri_str("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200")
            .await
            .unwrap();
        MongoUserStore::from_collection(client.database("users_test").collection(USERS_COLLECTION))
    }

    #[test]
    fn parse_object_id_accepts_hex() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
    }

    #[tokio::test]
    async fn get_with_malformed_id_is_invalid_argument() {
        let store = offline_store().await;
        assert!(matches!(
            store.get("not-a-valid-hex-id").await,
            Err(StorageError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn update_and_delete_with_malformed_id_are_invalid_argument() {
        let store = offline_store().await;
        assert!(matches!(
            store.update("123", User::new("Ann", "ann@x.com")).await,
            Err(StorageError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.delete("zzzzzzzzzzzzzzzzzzzzzzzz").await,
            Err(StorageError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_database_error() {
        let store = offline_store().await;
        assert!(matches!(
            store.get(&ObjectId::new().to_hex()).await,
            Err(StorageError::Database(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn crud_round_trip_against_live_server() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::connect(&uri, "users_service_test").await.unwrap();
        let store = MongoUserStore::new(&db);

        let id = store.create(User::new("Ann", "ann@x.com").with_id("ignored")).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), User::new("Ann", "ann@x.com").with_id(id.clone()));

        store.update(&id, User::new("Ann2", "ann@x.com")).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().name, "Ann2");
        assert!(store.list().await.unwrap().iter().any(|u| u.id == id));

        store.delete(&id).await.unwrap();
        assert!(matches!(store.delete(&id).await, Err(StorageError::NotFound)));
        assert!(matches!(
            store.update(&id, User::new("Ann", "ann@x.com")).await,
            Err(StorageError::NotFound)
        ));
    }
}

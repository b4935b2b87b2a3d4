use crate::storage::StorageResult;
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Builds the client and pings the server once. Any failure here is a
    /// connectivity failure and callers treat it as fatal.
    pub async fn connect(uri: &str, db_name: &str) -> StorageResult<Self> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("users-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(10));
        client_options.server_selection_timeout = Some(Duration::from_secs(10));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        db.run_command(doc! { "ping": 1 }).await?;
        log::info!("✅ Connected to MongoDB database: {}", db_name);

        Ok(Self { db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_uri_is_rejected() {
        assert!(MongoDB::connect("not-a-mongo-uri", "users").await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::connect(&uri, "users_service_test").await.unwrap();
        assert_eq!(db.database().name(), "users_service_test");
        assert!(db.database().list_collection_names().await.is_ok());
    }
}

use super::store::{parse_id, StoreError, UserStore};
use crate::models::{User, UserFields};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoUserStore {
    client: MongoClient,
    db: Database,
    users: Collection<User>,
}

impl MongoUserStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let users = db.collection(collection);
        tracing::info!(
            database = %database,
            collection = %collection,
            "Successfully connected to MongoDB database"
        );
        Ok(Self { client, db, users })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for user-service");

        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": 1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.users
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create createdAt index on users collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on users.createdAt");

        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: User) -> Result<String, StoreError> {
        let result = self.users.insert_one(&user, None).await?;
        result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .ok_or_else(|| StoreError::UnexpectedId(result.inserted_id.to_string()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let id = parse_id(id)?;
        Ok(self.users.find_one(doc! { "_id": id }, None).await?)
    }

    async fn update_by_id(&self, id: &str, fields: &UserFields) -> Result<u64, StoreError> {
        let id = parse_id(id)?;
        let update = doc! {
            "$set": {
                "name": fields.name.as_str(),
                "dob": fields.dob.as_str(),
                "address": fields.address.as_str(),
                "description": fields.description.as_str(),
            }
        };
        let result = self
            .users
            .update_one(doc! { "_id": id }, update, None)
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        let id = parse_id(id)?;
        let result = self.users.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users.find(doc! {}, None).await?;
        Ok(cursor.try_collect::<Vec<User>>().await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

use super::store::{parse_id, StoreError, UserStore};
use crate::models::{User, UserFields};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local user store for running without MongoDB.
///
/// Ids are real ObjectIds, so clients see the same identifier format as with
/// the MongoDB backend. ObjectIds generated by one process increase
/// monotonically, which keeps `find_all` in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<BTreeMap<ObjectId, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, mut user: User) -> Result<String, StoreError> {
        let id = ObjectId::new();
        user.id = Some(id);
        self.users.write().await.insert(id, user);
        Ok(id.to_hex())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let id = parse_id(id)?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_by_id(&self, id: &str, fields: &UserFields) -> Result<u64, StoreError> {
        let id = parse_id(id)?;
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.apply(fields);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        let id = parse_id(id)?;
        Ok(u64::from(self.users.write().await.remove(&id).is_some()))
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> UserFields {
        UserFields {
            name: name.to_string(),
            dob: "12 Dec 2002".to_string(),
            address: "8194 Queens".to_string(),
            description: "Developer".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryUserStore::new();
        let id = store.insert(User::new(fields("Peter"))).await.unwrap();

        let user = store.find_by_id(&id).await.unwrap().expect("user exists");
        assert_eq!(user.name, "Peter");
        assert_eq!(user.id_hex(), id);
    }

    #[tokio::test]
    async fn update_reports_matches_and_keeps_created_at() {
        let store = InMemoryUserStore::new();
        let id = store.insert(User::new(fields("Peter"))).await.unwrap();
        let before = store.find_by_id(&id).await.unwrap().unwrap();

        assert_eq!(store.update_by_id(&id, &fields("Miles")).await.unwrap(), 1);
        assert_eq!(
            store.update_by_id(&ObjectId::new().to_hex(), &fields("Gwen")).await.unwrap(),
            0
        );

        let after = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(after.name, "Miles");
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn delete_is_counted_once() {
        let store = InMemoryUserStore::new();
        let id = store.insert(User::new(fields("Peter"))).await.unwrap();

        assert_eq!(store.delete_by_id(&id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(&id).await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = InMemoryUserStore::new();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            ids.push(store.insert(User::new(fields(name))).await.unwrap());
        }

        let listed: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(User::id_hex)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn malformed_ids_are_errors() {
        let store = InMemoryUserStore::new();
        assert!(matches!(
            store.find_by_id("123").await,
            Err(StoreError::InvalidId { .. })
        ));
        assert!(store.delete_by_id("zz").await.is_err());
    }
}

use crate::models::{User, UserFields};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid user id '{id}': {source}")]
    InvalidId {
        id: String,
        #[source]
        source: mongodb::bson::oid::Error,
    },

    #[error("invalid user id: {0}")]
    UndecodableId(String),

    #[error("no user found with id '{0}'")]
    NoDocument(String),

    #[error("store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Backend(#[from] mongodb::error::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

/// Parse an identifier token as handed to us by a client.
pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|source| StoreError::InvalidId {
        id: id.to_string(),
        source,
    })
}

/// Persistence for user documents. Identifiers cross this boundary as opaque
/// strings; each backend decides how to parse them.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return the identifier the store assigned.
    async fn insert(&self, user: User) -> Result<String, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Overwrite the business fields of a user. Returns the number of
    /// documents matched (0 or 1).
    async fn update_by_id(&self, id: &str, fields: &UserFields) -> Result<u64, StoreError>;

    /// Returns the number of documents removed (0 or 1).
    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError>;

    /// Every user, in store order.
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}

/// Run store work under a time budget, recording its outcome.
///
/// The budget covers everything inside `work`, so a handler that updates and
/// then re-reads spends a single budget on both calls.
pub async fn with_budget<T, F>(
    operation: &'static str,
    budget: Duration,
    work: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let start = Instant::now();

    let result = match tokio::time::timeout(budget, work).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(budget)),
    };

    let outcome = match &result {
        Ok(_) => "ok",
        Err(StoreError::Timeout(_)) => "timeout",
        Err(_) => "error",
    };
    super::metrics::record_store_operation(operation, outcome, start.elapsed());

    if let Err(e) = &result {
        tracing::warn!(operation, error = %e, "Store operation failed");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_hex_object_ids() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("not-an-id").unwrap_err();
        assert!(matches!(err, StoreError::InvalidId { .. }));
        assert!(err.to_string().contains("not-an-id"));
    }

    #[tokio::test]
    async fn budget_expiry_is_a_timeout_error() {
        let result: Result<(), StoreError> = with_budget("test", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn work_inside_budget_passes_through() {
        let result =
            with_budget("test", Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn store_errors_become_database_errors() {
        let err = AppError::from(StoreError::NoDocument("abc".to_string()));
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "no user found with id 'abc'");
    }
}

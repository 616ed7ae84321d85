pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoUserStore;
pub use memory::InMemoryUserStore;
pub use self::metrics::{get_metrics, init_metrics, record_store_operation};
pub use store::{parse_id, with_budget, StoreError, UserStore};

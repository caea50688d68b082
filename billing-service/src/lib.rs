pub mod config;
pub mod http;
pub mod metrics_server;
pub mod observability;
pub mod page;
pub mod readings;
pub mod store;

pub use http::{router, AppState};
pub use store::{RecordStore, SqliteRecordStore, StoreError};

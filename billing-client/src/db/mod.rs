pub mod electricity_queries;
pub mod pool;
pub mod schema;

pub use electricity_queries::{delete_last_record, insert_record, list_records, records_for_month};
pub use pool::{connect, connect_in_memory};
pub use schema::ensure_schema;

pub mod electricity_record;

pub use electricity_record::{ElectricityRecord, NewElectricityRecord};

//! Outbound ports - what the application needs from the outside world.

mod error;
mod platform;
mod record_store_port;

pub use error::StoreError;
pub use platform::{storage_keys, ClockPort, KeyValueStore};
pub use record_store_port::{RecordStore, StoredRecord};

#[cfg(test)]
pub use platform::MockClockPort;
#[cfg(test)]
pub use record_store_port::MockRecordStore;

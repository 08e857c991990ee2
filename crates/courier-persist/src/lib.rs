pub mod codec;
pub mod dbs;
pub mod error;
pub mod file;
pub mod gateway;
pub mod memory;

pub use codec::{decode, encode, SCHEMA_VERSION};
pub use error::{PersistError, Result};
pub use file::FileGateway;
pub use gateway::PersistenceGateway;
pub use memory::MemoryGateway;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoGateway;

pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::OrdererConfig;

pub mod resolvent;
pub use resolvent::Resolvent;
pub use resolvent::DestinationType;

pub mod package;
pub mod resolution;
pub mod nag;
pub mod job;

pub mod orderer;
pub use orderer::OrdererBuilder;
pub use orderer::Orderer;

pub mod resolved;
pub use resolved::Resolved;

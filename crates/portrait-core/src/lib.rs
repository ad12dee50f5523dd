pub mod batch;
pub mod config;
pub mod credentials;
pub mod error;
pub mod registry;
pub mod store;

pub use batch::{BatchDriver, BatchReport, EntryOutcome, PhotoSession, SessionOpener};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use store::{ImageStore, PhotoStore};

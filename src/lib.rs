pub mod cohort;
pub mod config;
pub mod curate;
pub mod discover;
pub mod error;
pub mod key;
pub mod normalize;
pub mod provenance;
pub mod table;

pub use config::Config;
pub use error::{CurateError, Result};

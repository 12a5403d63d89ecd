pub mod changelog;
pub mod config;
pub mod emoji;
pub mod error;
pub mod git;
pub mod project;
pub mod release;
pub mod runner;
pub mod signing;
pub mod ui;
pub mod version;

pub use error::{MexReleaseError, Result};
pub use release::Releaser;

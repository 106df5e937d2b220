// folio: portfolio page enhancer.
// Theme toggling, scroll reveal, and cached GitHub profile, repository, and activity sections.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod github;
pub mod page;
pub mod portfolio;
pub mod reveal;
pub mod theme;

pub use config::Config;
pub use error::{FolioError, Result};
pub use portfolio::Portfolio;

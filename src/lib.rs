pub mod app;
pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod format;
pub mod github;
pub mod interaction;
pub mod page;
pub mod render;
pub mod repositories;
pub mod stats;
pub mod types;

pub use app::{LoadReport, Portfolio};
pub use config::PortfolioConfig;
pub use dom::{share, ElementId, Host, SharedHost};
pub use error::{PortfolioError, Result};
pub use page::Page;

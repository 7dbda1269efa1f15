pub mod backlog;
pub mod board;
pub mod check;
pub mod config;
pub mod error;
pub mod io;
pub mod item;
pub mod markdown;
pub mod paths;
pub mod score;
pub mod transition;
pub mod types;

pub use backlog::Backlog;
pub use error::{AtlasError, Result};
pub use item::{Details, Item};

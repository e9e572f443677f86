pub mod action;
pub mod config;
pub mod error;
pub mod history;
pub mod inbox;
pub mod io;
pub mod paths;
pub mod popular;
pub mod project;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{GtdError, Result};

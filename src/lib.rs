pub mod batch;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod hierarchy;
pub mod interactive;
pub mod logging;
pub mod output;

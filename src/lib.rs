pub mod aggregate;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod filters;
pub mod logging;
pub mod pipeline;
pub mod portal;
pub mod report;
pub mod room;
pub mod search;
pub mod utils;

pub mod config;
pub mod fetch;
pub mod geo;
pub mod output;
pub mod parser;
pub mod progress;
pub mod report;

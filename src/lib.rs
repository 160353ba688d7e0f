pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod output;
pub mod pipeline;
pub mod shorts;
pub mod youtube;

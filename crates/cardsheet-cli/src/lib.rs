//! Library side of the `cardsheet` importer: logging setup, profile
//! loading and the import pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;

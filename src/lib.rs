//! specsift - submittal product extraction pipeline.
//!
//! Core library exposing the pipeline modules used by the `sift` binary.

// Provider types use `from_str` methods that return Option<Self> (infallible
// parse), not Result<Self, Error> as std::str::FromStr requires.
#![allow(clippy::should_implement_trait)]

pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod prefilter;
pub mod report;
pub mod rules;
pub mod utils;

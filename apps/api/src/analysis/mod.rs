//! The analysis pipeline: prompt construction, multi-model evaluation
//! fan-out, response parsing, score aggregation, and progress reporting.

pub mod aggregator;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod prompts;

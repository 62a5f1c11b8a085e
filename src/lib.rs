//! BpSummary - Business Process Summary Engine
//!
//! Scores business processes, steps and groups on six dimensions and
//! classifies each score into a qualitative bucket. The entry point for
//! library use is [`analysis::compute_summaries`] or
//! [`analysis::SummaryEngine`].

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod locations;
pub mod models;
pub mod report;
pub mod text;

//! Structured Record Generator and the `/parse-resume` endpoint.

pub mod generator;
pub mod handlers;
pub mod heuristics;
pub mod models;
pub mod prompts;

/// End-to-end analysis: load, extract, classify, seed, enrich, summarize

pub mod service;

pub use service::{AnalysisService, DataFiles};

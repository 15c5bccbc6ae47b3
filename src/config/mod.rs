// src/config/mod.rs
pub mod enrichment;

pub use enrichment::EnrichmentConfig;

// Enriched output records and sentiment tallies.

pub mod models;
pub mod summary;

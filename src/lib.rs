// Sentiscope: sentiment and bot-likelihood enrichment for scraped Instagram data
//
// This is the library root. Each module corresponds to one stage of the
// enrichment pipelines.

pub mod bot;
pub mod config;
pub mod instagram;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod status;

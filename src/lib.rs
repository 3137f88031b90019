pub mod config;
pub mod counter;
pub mod error;
pub mod feed;
pub mod merge;
pub mod monitoring;
pub mod pipeline;
pub mod present;
pub mod status;

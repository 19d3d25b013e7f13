pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod output;
pub mod poller;
pub mod reading;
pub mod store;
pub mod submit;

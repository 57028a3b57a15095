pub mod clock;
pub mod config;
pub mod date;
pub mod enrichment;
pub mod environment;
pub mod errors;
pub mod normalization;
pub mod routes;
pub mod store;
pub mod student;
pub mod urls;

//! Tech message knowledge engine: a catalog of regex-pattern remediation
//! records, a matching/recommendation engine over it, and the REST API
//! exposing search plus catalog administration.

pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

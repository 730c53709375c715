//! NS journey enrichment server.
//!
//! Answers "what is this train, what does it look like, and does it still
//! go where the board says?" by combining the NS station boards with train
//! compositions, stop lists and disruptions, and follows one pinned
//! journey live.

pub mod changes;
pub mod config;
pub mod domain;
pub mod enrich;
pub mod stations;
pub mod tracker;
pub mod upstream;
pub mod web;

//! Vetrina: a catalog service with a cache-aside layer in front of Postgres.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

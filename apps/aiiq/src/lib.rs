//! # aiiq
//!
//! Library half of the `aiiq` binary: configuration, CLI and HTTP adapter
//! around `aiiq-core`. Split out so integration tests can drive the router
//! without starting a server.

pub mod api;
pub mod cli;
pub mod config;

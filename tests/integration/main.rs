//! Integration tests for the census pipeline
//!
//! These tests use wiremock to serve sitemaps and pages and run the
//! pipeline end-to-end against them.

mod common;
mod discovery_tests;
mod pipeline_tests;

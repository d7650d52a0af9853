//! Integration test suite for Site-Gleaner

mod crawl_tests;
mod export_tests;

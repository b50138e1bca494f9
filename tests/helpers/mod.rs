// ABOUTME: Shared test helper modules for integration tests
// ABOUTME: Re-exports the axum router test utilities

#![allow(dead_code)]

pub mod axum_test;

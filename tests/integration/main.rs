//! Integration tests
//!
//! `router_tests` run without a database. `workflow_tests` need `DATABASE_URL`
//! and `api_tests` need a running server; both are ignored by default:
//! cargo test -- --ignored

mod api_tests;
mod router_tests;
mod workflow_tests;

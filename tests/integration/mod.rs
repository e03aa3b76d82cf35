//! Integration test suites

mod auth_tests;
mod donor_tests;
mod health_tests;
mod notify_tests;
mod request_tests;

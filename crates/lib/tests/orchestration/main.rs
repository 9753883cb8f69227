//! End-to-end orchestration tests driven through the public API.

mod common;
mod pipeline_tests;
mod scenario_tests;

//! Integration tests for write-guard

mod hook_tests;

//! Unit test module
//!
//! Handler unit tests live here, separate from source files.
//! Tests drive handlers through the Handler trait with recording mock gateways.

mod repeat_handler_test;

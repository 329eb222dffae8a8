//! Unit tests for the HTTP observer
//!
//! This module contains tests for the components of the crate, plus shared
//! test doubles in `support`.

pub mod support;

pub mod config_tests;

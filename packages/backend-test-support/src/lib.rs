//! Shared helpers for beanpot tests: logging bootstrap and unique fixtures.

pub mod logging;
pub mod unique_helpers;

//! Common test utilities for climplot.
//!
//! Synthetic dataset builders, PNG checks and float assertions shared by the
//! integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;

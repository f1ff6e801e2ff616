//! System utilities and monitoring
//!
//! This module contains metrics collection and exposition.

pub mod metrics;

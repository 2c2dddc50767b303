//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Vector and matrix math
//! - Quaternion rotation of body axes
//! - Logging setup

pub mod math;
pub mod quaternion;
pub mod logging;

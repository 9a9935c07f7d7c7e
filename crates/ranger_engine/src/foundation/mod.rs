//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and matrix builders
//! - Rectangles for 2D bounds tests
//! - Arena handles for the scene graph
//! - Frame timing
//! - Logging setup

pub mod math;
pub mod rectangle;
pub mod collections;
pub mod time;
pub mod logging;

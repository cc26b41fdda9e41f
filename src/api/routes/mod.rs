//! API Routes
//!
//! Route handlers organized by functionality.

pub mod controls;
pub mod dashboard;
pub mod health;

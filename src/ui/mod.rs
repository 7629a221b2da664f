//! UI module for FitLock
//!
//! This module contains the rendering for the single screen: the header
//! with streak badge, the app grid for the setup steps, the goal, workout
//! and success views, stat cards and the alert overlay.

mod apps;
mod helpers;
mod render;
mod session;
mod stats;

pub use render::draw;

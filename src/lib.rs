//! Particle fireworks for the terminal.
//!
//! [`fireworks::Sky`] owns the live rockets and drives them frame by frame
//! onto any [`surface::Surface`]; [`canvas::Canvas`] is the surface that
//! ends up on screen as true-colour half blocks.

pub mod canvas;
pub mod color;
pub mod config;
pub mod fireworks;
pub mod surface;

//! Message types produced by the collision pass.
//!
//! Messages provide a decoupled way for systems to communicate: detection
//! publishes, resolution and gameplay rules consume independently.
//!
//! Submodules:
//! - [`collision`] – one event per colliding pair and shared layer
//! - [`touch`] – directional contacts emitted by Box-vs-Box resolution
pub mod collision;
pub mod touch;

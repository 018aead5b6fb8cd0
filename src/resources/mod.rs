//! ECS resources made available to systems.
//!
//! Overview
//! - `collisionbuffer` – per-frame event buffer drained by resolution
//! - `collisionconfig` – INI-backed tunables for detection and resolution
//! - `worldtime` – simulation time, delta and frame count
pub mod collisionbuffer;
pub mod collisionconfig;
pub mod worldtime;

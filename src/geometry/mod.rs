//! Collision math, independent of the ECS.
//!
//! Submodules overview
//! - [`rect`] – float AABB used for broad phase and as the slab-test target
//! - [`sweep`] – ray-vs-rectangle slab test and swept box-vs-box contact
//! - [`sat`] – separating axis test, polygon projection and helpers

pub mod rect;
pub mod sat;
pub mod sweep;

pub use rect::CollisionRect;
pub use sat::SatContact;
pub use sweep::SweptContact;

//! Directional touch messages emitted by Box-vs-Box resolution.
//!
//! Meant for simple gameplay checks such as "standing on ground" or
//! "against a wall". Convex contacts never produce them.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;
use glam::Vec2;

/// Face of the touched entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Face that owns an axis-aligned contact normal. The normal points out
    /// of the touched face, so `(0, -1)` is the top face in y-down space.
    pub fn from_normal(normal: Vec2) -> Option<Self> {
        if normal.x < 0.0 {
            Some(Side::Left)
        } else if normal.x > 0.0 {
            Some(Side::Right)
        } else if normal.y < 0.0 {
            Some(Side::Top)
        } else if normal.y > 0.0 {
            Some(Side::Bottom)
        } else {
            None
        }
    }

    /// Split a normal into its horizontal and vertical faces.
    pub fn from_axes(normal: Vec2) -> (Option<Self>, Option<Self>) {
        (
            Self::from_normal(Vec2::new(normal.x, 0.0)),
            Self::from_normal(Vec2::new(0.0, normal.y)),
        )
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    /// Entity whose face was touched.
    pub entity: Entity,
    /// Entity that moved into it.
    pub by: Entity,
    pub side: Side,
}

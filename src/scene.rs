//! Data-driven scene spawning.
//!
//! A scene is a JSON list of entities. Each entity gets a [`Transform`], an
//! optional [`Velocity`] and [`Group`], and one shape. Shapes are attached in
//! the same insertion as the rest of the bundle, so the [`ColliderTag`] is
//! present from the first frame.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "entities": [
//!     { "group": "wall", "position": [50.0, 0.0], "passive": true,
//!       "shape": { "type": "box", "width": 16.0, "height": 16.0 } },
//!     { "group": "mover", "position": [0.0, 0.0], "velocity": [600.0, 0.0],
//!       "layers": [1, 2],
//!       "shape": { "type": "convex", "vertices": [[0, 0], [10, 0], [5, 10]] } },
//!     { "position": [4.0, 0.0], "parent": 1,
//!       "shape": { "type": "box", "width": 2.0, "height": 2.0 } }
//!   ]
//! }
//! ```
//!
//! `parent` is the index of another entry in the same list; the child's
//! position, rotation and scale are then local to that parent.
//!
//! [`ColliderTag`]: crate::components::collider::ColliderTag

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::components::boxshape::BoxShape;
use crate::components::collider::LayerMask;
use crate::components::convexshape::ConvexShape;
use crate::components::group::Group;
use crate::components::transform::Transform;
use crate::components::velocity::Velocity;

fn default_true() -> bool {
    true
}

fn default_scale() -> Vec2 {
    Vec2::ONE
}

/// Structure representing a scene loaded from JSON.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SceneData {
    pub entities: Vec<EntityData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EntityData {
    #[serde(default)]
    pub group: Option<String>,
    pub position: Vec2,
    /// Radians.
    #[serde(default)]
    pub rotation: f32,
    /// Stretches convex vertices and child offsets. Boxes ignore it.
    #[serde(default = "default_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub velocity: Option<Vec2>,
    pub shape: ShapeData,
    /// Omitted means every layer.
    #[serde(default)]
    pub layers: Option<Vec<i32>>,
    #[serde(default)]
    pub passive: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub parent: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeData {
    Box {
        width: f32,
        height: f32,
        #[serde(default)]
        offset: Vec2,
    },
    Convex {
        vertices: Vec<Vec2>,
        #[serde(default)]
        ignore_rotation: bool,
    },
}

impl SceneData {
    /// Loads scene data from a JSON file at the specified path.
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        let scene: SceneData = serde_json::from_str(&file_content)?;
        info!("Loaded scene {} with {} entities", path, scene.entities.len());
        Ok(scene)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Scattered boxes and polygons for stress runs. The same seed always
    /// yields the same scene.
    pub fn random(count: usize, seed: u64, extent: Vec2) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut entities = Vec::with_capacity(count);
        for i in 0..count {
            let position = Vec2::new(rng.f32() * extent.x, rng.f32() * extent.y);
            let layers = vec![rng.i32(0..4)];
            // Every fourth entity is a static wall.
            if i % 4 == 0 {
                entities.push(EntityData {
                    group: Some("wall".to_string()),
                    position,
                    rotation: 0.0,
                    scale: Vec2::ONE,
                    velocity: None,
                    shape: ShapeData::Box {
                        width: 8.0 + rng.f32() * 56.0,
                        height: 8.0 + rng.f32() * 56.0,
                        offset: Vec2::ZERO,
                    },
                    layers: Some(layers),
                    passive: true,
                    enabled: true,
                    parent: None,
                });
                continue;
            }
            let angle = rng.f32() * std::f32::consts::TAU;
            let speed = 20.0 + rng.f32() * 400.0;
            let shape = if rng.bool() {
                let size = 4.0 + rng.f32() * 20.0;
                ShapeData::Box {
                    width: size,
                    height: size,
                    offset: Vec2::splat(-size * 0.5),
                }
            } else {
                let sides = rng.usize(3..=6);
                let radius = 4.0 + rng.f32() * 14.0;
                ShapeData::Convex {
                    vertices: regular_polygon(sides, radius),
                    ignore_rotation: false,
                }
            };
            entities.push(EntityData {
                group: Some("mover".to_string()),
                position,
                rotation: rng.f32() * std::f32::consts::TAU,
                scale: Vec2::ONE,
                velocity: Some(Vec2::from_angle(angle) * speed),
                shape,
                layers: Some(layers),
                passive: false,
                enabled: true,
                parent: None,
            });
        }
        Self { entities }
    }
}

/// Vertices of a regular polygon centred on the origin.
pub fn regular_polygon(sides: usize, radius: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| Vec2::from_angle(i as f32 * std::f32::consts::TAU / sides as f32) * radius)
        .collect()
}

/// Spawn every entry of `scene`. Returns the spawned entity per entry, or
/// `None` where the entry was rejected.
pub fn spawn_scene(world: &mut World, scene: &SceneData) -> Vec<Option<Entity>> {
    let mut spawned = Vec::with_capacity(scene.entities.len());
    for (index, data) in scene.entities.iter().enumerate() {
        let entity = spawn_entity(world, data);
        if entity.is_none() {
            warn!("Skipping scene entity {}: invalid convex shape", index);
        }
        spawned.push(entity);
    }

    for (index, data) in scene.entities.iter().enumerate() {
        let (Some(child), Some(parent_index)) = (spawned[index], data.parent) else {
            continue;
        };
        match spawned.get(parent_index).copied().flatten() {
            Some(parent) if parent != child => {
                world.entity_mut(child).insert(ChildOf(parent));
            }
            _ => warn!(
                "Scene entity {} has invalid parent {}, leaving it at the root",
                index, parent_index
            ),
        }
    }
    spawned
}

fn spawn_entity(world: &mut World, data: &EntityData) -> Option<Entity> {
    let layers = data
        .layers
        .clone()
        .map(LayerMask::from_layers)
        .unwrap_or_default();
    let transform = Transform::from_vec(data.position)
        .with_rotation(data.rotation)
        .with_scale(data.scale);

    let mut entity = match &data.shape {
        ShapeData::Box {
            width,
            height,
            offset,
        } => {
            let mut shape = BoxShape::new(*width, *height).with_offset(*offset);
            shape.layers = layers;
            shape.passive = data.passive;
            shape.enabled = data.enabled;
            world.spawn((transform, shape))
        }
        ShapeData::Convex {
            vertices,
            ignore_rotation,
        } => {
            let mut shape = match ConvexShape::try_new(vertices.clone()) {
                Ok(shape) => shape.with_ignore_rotation(*ignore_rotation),
                Err(e) => {
                    warn!("{}", e);
                    return None;
                }
            };
            shape.layers = layers;
            shape.passive = data.passive;
            shape.enabled = data.enabled;
            world.spawn((transform, shape))
        }
    };

    if let Some(velocity) = data.velocity {
        entity.insert(Velocity::from_vec(velocity));
    }
    if let Some(group) = &data.group {
        entity.insert(Group::new(group.clone()));
    }
    Some(entity.id())
}

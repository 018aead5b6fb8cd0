//! Aberred Collision headless driver.
//!
//! Loads a scene (JSON file or a seeded random one), runs the collision pass
//! for a fixed number of frames with a fixed time step and logs what happened
//! each frame.
//!
//! # Frame
//!
//! 1. Advance [`WorldTime`] by the fixed delta
//! 2. Run the schedule: commit, movement, hierarchy, convex caches,
//!    detection, resolution, gameplay rules
//! 3. Log collision and touch counts
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --random 500 --seed 42 --frames 120
//! ```

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::{debug, error, info, warn};
use std::path::PathBuf;

use aberredcollision::components::collision::CollisionRule;
use aberredcollision::components::transform::Transform;
use aberredcollision::components::velocity::Velocity;
use aberredcollision::events::collision::CollisionEvent;
use aberredcollision::events::touch::TouchEvent;
use aberredcollision::resources::collisionconfig::CollisionConfig;
use aberredcollision::resources::worldtime::WorldTime;
use aberredcollision::scene::{SceneData, spawn_scene};
use aberredcollision::systems::time::update_world_time;
use aberredcollision::systems::{build_schedule, init_collision_resources};

/// Aberred Collision 2D
#[derive(Parser)]
#[command(version, about = "Headless 2D collision detection and resolution runner")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./collision.ini")]
    config: PathBuf,

    /// JSON scene to load.
    #[arg(long, value_name = "PATH", conflicts_with = "random")]
    scene: Option<PathBuf>,

    /// Spawn a random scene with this many entities.
    #[arg(long, value_name = "COUNT")]
    random: Option<usize>,

    /// Seed for the random scene.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Frames to simulate. Overrides the config file.
    #[arg(long)]
    frames: Option<u32>,
}

/// Layer on which walls destroy whatever runs into them.
const HAZARD_LAYER: i32 = 3;

/// Movers that hit a wall on the hazard layer are removed.
fn destroy_on_hazard(
    mover: Entity,
    wall: Entity,
    event: &CollisionEvent,
    commands: &mut Commands,
    _transforms: &mut Query<&mut Transform>,
    velocities: &mut Query<&mut Velocity>,
) {
    if let Ok(mut velocity) = velocities.get_mut(mover) {
        velocity.freeze();
    }
    debug!(
        "{:?} destroyed by hazard {:?} at {:?}",
        mover, wall, event.contact_point
    );
    commands.entity(mover).try_despawn();
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    log::info!("Hello, world! This is Aberred Collision!");
    let mut config = CollisionConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    let frames = config.frames;
    let fixed_delta = config.fixed_delta;

    let scene = match (&cli.scene, cli.random) {
        (Some(path), _) => match SceneData::load_from_file(&path.to_string_lossy()) {
            Ok(scene) => scene,
            Err(e) => {
                error!("Failed to load scene from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        (None, Some(count)) => SceneData::random(count, cli.seed, Vec2::splat(1024.0)),
        (None, None) => SceneData::random(64, cli.seed, Vec2::splat(512.0)),
    };

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(config);
    init_collision_resources(&mut world);

    let spawned = spawn_scene(&mut world, &scene);
    info!(
        "Spawned {} of {} scene entities",
        spawned.iter().flatten().count(),
        scene.entities.len()
    );
    world.spawn(CollisionRule::new("mover", "wall", destroy_on_hazard).on_layer(HAZARD_LAYER));
    world.flush();

    let mut update = build_schedule();
    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    let mut collision_reader = world
        .resource::<Messages<CollisionEvent>>()
        .get_cursor();
    let mut touch_reader = world.resource::<Messages<TouchEvent>>().get_cursor();
    let (mut total_collisions, mut total_touches) = (0usize, 0usize);

    // --------------- Main loop ---------------
    for _ in 0..frames {
        update_world_time(&mut world, fixed_delta);
        update.run(&mut world);

        let collisions = collision_reader
            .read(world.resource::<Messages<CollisionEvent>>())
            .count();
        let touches = touch_reader
            .read(world.resource::<Messages<TouchEvent>>())
            .count();
        total_collisions += collisions;
        total_touches += touches;

        let frame = world.resource::<WorldTime>().frame_count;
        debug!(
            "frame {}: {} collision events, {} touch events",
            frame, collisions, touches
        );
        world.clear_trackers();
    }

    info!(
        "Simulated {} frames: {} collision events, {} touch events",
        frames, total_collisions, total_touches
    );
}

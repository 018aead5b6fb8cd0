//! Collision pass configuration resource.
//!
//! Holds tunables for detection fan-out and resolution, plus the fixed-step
//! simulation settings used by the headless driver. Defaults are safe for
//! startup; [`CollisionConfig::load_from_file`] overrides whatever the INI
//! file provides.
//!
//! # Configuration File Format
//!
//! ```ini
//! [collision]
//! parallel = true
//! ; 0 picks the number of available cores
//! workers = 0
//! ; minimum active colliders before detection fans out
//! parallel_threshold = 64
//! ; comma separated, -1 resolves every layer
//! resolve_layers = -1
//! emit_touch_events = true
//!
//! [simulation]
//! frames = 240
//! fixed_delta = 0.0166667
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::collider::LayerMask;

/// Default safe values for startup
const DEFAULT_PARALLEL: bool = true;
const DEFAULT_WORKERS: usize = 0;
const DEFAULT_PARALLEL_THRESHOLD: usize = 64;
const DEFAULT_EMIT_TOUCH_EVENTS: bool = true;
const DEFAULT_FRAMES: u32 = 240;
const DEFAULT_FIXED_DELTA: f32 = 1.0 / 60.0;
const DEFAULT_CONFIG_PATH: &str = "./collision.ini";

#[derive(Resource, Debug, Clone)]
pub struct CollisionConfig {
    /// Fan detection out across worker threads.
    pub parallel: bool,
    /// Worker thread count. Zero means available parallelism.
    pub workers: usize,
    /// Minimum active colliders before detection goes parallel.
    pub parallel_threshold: usize,
    /// Layers whose events are resolved. Wildcard resolves all of them.
    pub resolve_layers: LayerMask,
    /// Emit [`TouchEvent`](crate::events::touch::TouchEvent)s on Box-vs-Box resolution.
    pub emit_touch_events: bool,
    /// Frames to simulate in the headless driver.
    pub frames: u32,
    /// Fixed time step in seconds.
    pub fixed_delta: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            workers: DEFAULT_WORKERS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            resolve_layers: LayerMask::wildcard(),
            emit_touch_events: DEFAULT_EMIT_TOUCH_EVENTS,
            frames: DEFAULT_FRAMES,
            fixed_delta: DEFAULT_FIXED_DELTA,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Single-threaded detection regardless of collider count.
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::new()
        }
    }

    /// Number of detection workers to spawn.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Whether a frame with `active` initiating colliders should fan out.
    pub fn use_parallel(&self, active: usize) -> bool {
        self.parallel && active >= self.parallel_threshold.max(1) && self.worker_count() > 1
    }

    /// Whether events on `layer` are handed to resolution.
    pub fn resolves_layer(&self, layer: i32) -> bool {
        self.resolve_layers.is_wildcard() || self.resolve_layers.contains(layer)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: parallel={}, workers={}, threshold={}, resolve_layers={:?}, touch={}, frames={}, dt={}",
            self.parallel,
            self.workers,
            self.parallel_threshold,
            self.resolve_layers.iter().collect::<Vec<_>>(),
            self.emit_touch_events,
            self.frames,
            self.fixed_delta
        );

        Ok(())
    }

    /// Load configuration from INI text. Same rules as [`load_from_file`](Self::load_from_file).
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [collision] section
        if let Some(parallel) = config.getbool("collision", "parallel").ok().flatten() {
            self.parallel = parallel;
        }
        if let Some(workers) = config.getuint("collision", "workers").ok().flatten() {
            self.workers = workers as usize;
        }
        if let Some(threshold) = config
            .getuint("collision", "parallel_threshold")
            .ok()
            .flatten()
        {
            self.parallel_threshold = threshold as usize;
        }
        if let Some(layers) = config.get("collision", "resolve_layers") {
            match parse_layers(&layers) {
                Ok(mask) => self.resolve_layers = mask,
                Err(e) => warn!("Ignoring resolve_layers: {}", e),
            }
        }
        if let Some(touch) = config
            .getbool("collision", "emit_touch_events")
            .ok()
            .flatten()
        {
            self.emit_touch_events = touch;
        }

        // [simulation] section
        if let Some(frames) = config.getuint("simulation", "frames").ok().flatten() {
            self.frames = frames as u32;
        }
        if let Some(dt) = config.getfloat("simulation", "fixed_delta").ok().flatten() {
            if dt > 0.0 {
                self.fixed_delta = dt as f32;
            } else {
                warn!("Ignoring non-positive fixed_delta {}", dt);
            }
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [collision] section
        config.set("collision", "parallel", Some(self.parallel.to_string()));
        config.set("collision", "workers", Some(self.workers.to_string()));
        config.set(
            "collision",
            "parallel_threshold",
            Some(self.parallel_threshold.to_string()),
        );
        let layers: Vec<String> = self.resolve_layers.iter().map(|l| l.to_string()).collect();
        config.set("collision", "resolve_layers", Some(layers.join(",")));
        config.set(
            "collision",
            "emit_touch_events",
            Some(self.emit_touch_events.to_string()),
        );

        // [simulation] section
        config.set("simulation", "frames", Some(self.frames.to_string()));
        config.set(
            "simulation",
            "fixed_delta",
            Some(self.fixed_delta.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

/// Parse a comma separated layer list such as `"1, 2, -1"`.
pub fn parse_layers(text: &str) -> Result<LayerMask, String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|e| format!("invalid layer '{}': {}", s, e))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LayerMask::from_layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollisionConfig::new();
        assert!(config.parallel);
        assert_eq!(config.workers, 0);
        assert_eq!(config.parallel_threshold, 64);
        assert!(config.resolve_layers.is_wildcard());
        assert!(config.emit_touch_events);
        assert_eq!(config.frames, 240);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut config = CollisionConfig::new();
        config
            .load_from_str(
                "[collision]\nparallel = false\nworkers = 3\nresolve_layers = 1, 4\n\n[simulation]\nframes = 10\nfixed_delta = 0.5\n",
            )
            .unwrap();
        assert!(!config.parallel);
        assert_eq!(config.workers, 3);
        assert_eq!(config.worker_count(), 3);
        assert_eq!(config.parallel_threshold, 64);
        assert!(config.resolves_layer(4));
        assert!(!config.resolves_layer(2));
        assert_eq!(config.frames, 10);
        assert!((config.fixed_delta - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let mut config = CollisionConfig::new();
        config
            .load_from_str("[collision]\nresolve_layers = one,two\n[simulation]\nfixed_delta = -1\n")
            .unwrap();
        assert!(config.resolve_layers.is_wildcard());
        assert!((config.fixed_delta - DEFAULT_FIXED_DELTA).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = CollisionConfig::with_path("/nonexistent/collision.ini");
        assert!(config.load_from_file().is_err());
    }

    #[test]
    fn test_use_parallel_threshold() {
        let config = CollisionConfig {
            workers: 4,
            parallel_threshold: 10,
            ..CollisionConfig::new()
        };
        assert!(!config.use_parallel(9));
        assert!(config.use_parallel(10));
        assert!(!CollisionConfig::serial().use_parallel(1000));
    }

    #[test]
    fn test_parse_layers() {
        let mask = parse_layers(" 1,2 ,3").unwrap();
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(parse_layers("x").is_err());
        assert!(parse_layers("").unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "collision_config_test_{}.ini",
            std::process::id()
        ));
        let mut original = CollisionConfig::with_path(&path);
        original.workers = 2;
        original.resolve_layers = LayerMask::from_layers([3]);
        original.save_to_file().unwrap();

        let mut loaded = CollisionConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.workers, 2);
        assert!(loaded.resolves_layer(3));
        assert!(!loaded.resolves_layer(1));
        let _ = std::fs::remove_file(&path);
    }
}

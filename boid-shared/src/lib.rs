//! Data exchanged between the simulator and its collaborators: click events
//! coming in, settings files, and frame snapshots going out to a renderer.

use boid_core::{Boid, FlockConfig, FlockEvent, FlockSimulator, Vector2D};
use serde::{Deserialize, Serialize};

/// Represents a 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

/// A click already mapped to world coordinates, scheduled for a frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClickEvent {
    /// Frame before whose step the click is applied.
    pub frame: u64,
    pub button: MouseButton,
    pub position: Position,
}

impl From<ClickEvent> for FlockEvent {
    /// Left click spawns a boid, right click scatters the flock.
    fn from(click: ClickEvent) -> Self {
        match click.button {
            MouseButton::Left => FlockEvent::Spawn(click.position.into()),
            MouseButton::Right => FlockEvent::Repel(click.position.into()),
        }
    }
}

/// Settings file schema. Missing fields fall back to [`FlockConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BoidSettings {
    pub width: f32,
    pub height: f32,
    pub num_boids: usize,
    pub max_speed: f32,
    pub max_rule_speed: f32,
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub spawn_speed: f32,
    pub initial_spread: Option<f32>,
    pub repel_radius: Option<f32>,
    pub repel_strength: f32,
}

impl Default for BoidSettings {
    fn default() -> Self {
        FlockConfig::default().into()
    }
}

impl From<FlockConfig> for BoidSettings {
    fn from(config: FlockConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            num_boids: config.initial_boids,
            max_speed: config.max_speed,
            max_rule_speed: config.max_rule_speed,
            separation_radius: config.separation_radius,
            alignment_radius: config.alignment_radius,
            cohesion_radius: config.cohesion_radius,
            separation_weight: config.separation_weight,
            alignment_weight: config.alignment_weight,
            cohesion_weight: config.cohesion_weight,
            spawn_speed: config.spawn_speed,
            initial_spread: config.initial_spread,
            repel_radius: config.repel_radius,
            repel_strength: config.repel_strength,
        }
    }
}

impl From<BoidSettings> for FlockConfig {
    fn from(settings: BoidSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            initial_boids: settings.num_boids,
            max_speed: settings.max_speed,
            max_rule_speed: settings.max_rule_speed,
            separation_radius: settings.separation_radius,
            alignment_radius: settings.alignment_radius,
            cohesion_radius: settings.cohesion_radius,
            separation_weight: settings.separation_weight,
            alignment_weight: settings.alignment_weight,
            cohesion_weight: settings.cohesion_weight,
            spawn_speed: settings.spawn_speed,
            initial_spread: settings.initial_spread,
            repel_radius: settings.repel_radius,
            repel_strength: settings.repel_strength,
        }
    }
}

/// Render-side copy of one boid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidState {
    pub position: Position,
    pub velocity: Position,
    /// Unit direction of travel, for drawing the beak.
    pub heading: Position,
}

impl From<&Boid> for BoidState {
    fn from(boid: &Boid) -> Self {
        Self {
            position: boid.position.into(),
            velocity: boid.velocity.into(),
            heading: boid.heading().into(),
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub boid_count: usize,
    pub boids: Vec<BoidState>,
}

impl FrameSnapshot {
    pub fn capture<R: rand::Rng>(simulator: &FlockSimulator<R>) -> Self {
        let boids: Vec<BoidState> = simulator.boids().iter().map(BoidState::from).collect();
        Self {
            frame: simulator.frame(),
            boid_count: boids.len(),
            boids,
        }
    }
}

use crate::error::{ConfigError, ConfigResult};

/// Construction-time parameters of a [`FlockSimulator`](crate::FlockSimulator)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub width: f32,
    pub height: f32,
    pub initial_boids: usize,
    pub max_speed: f32,
    /// Each rule's correction is clamped to this before weighting.
    pub max_rule_speed: f32,
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    /// Speed given to spawned and initial boids.
    pub spawn_speed: f32,
    /// Side of the square around the world centre that initial boids start in.
    /// `None` scatters them over the whole world.
    pub initial_spread: Option<f32>,
    /// Only boids within this distance of a repel point are pushed.
    /// `None` pushes every boid.
    pub repel_radius: Option<f32>,
    pub repel_strength: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            initial_boids: 100,
            max_speed: 2.0,
            max_rule_speed: 0.03,
            separation_radius: 25.0,
            alignment_radius: 50.0,
            cohesion_radius: 50.0,
            separation_weight: 1.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            spawn_speed: 1.0,
            initial_spread: Some(10.0),
            repel_radius: None,
            repel_strength: 10.0,
        }
    }
}

impl FlockConfig {
    pub fn with_bounds(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_initial_boids(mut self, count: usize) -> Self {
        self.initial_boids = count;
        self
    }

    /// Rejects values that would break the speed or bounds invariants.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ConfigError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }

        positive_speed("max_speed", self.max_speed)?;
        positive_speed("max_rule_speed", self.max_rule_speed)?;
        if !self.spawn_speed.is_finite() || self.spawn_speed < 0.0 {
            return Err(ConfigError::InvalidSpeed {
                name: "spawn_speed",
                value: self.spawn_speed,
            });
        }

        radius("separation_radius", self.separation_radius)?;
        radius("alignment_radius", self.alignment_radius)?;
        radius("cohesion_radius", self.cohesion_radius)?;
        if let Some(repel_radius) = self.repel_radius {
            radius("repel_radius", repel_radius)?;
        }

        weight("separation_weight", self.separation_weight)?;
        weight("alignment_weight", self.alignment_weight)?;
        weight("cohesion_weight", self.cohesion_weight)?;
        weight("repel_strength", self.repel_strength)?;

        if let Some(spread) = self.initial_spread {
            if !spread.is_finite() || spread < 0.0 {
                return Err(ConfigError::InvalidSpread(spread));
            }
        }

        Ok(())
    }
}

fn positive_speed(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSpeed { name, value })
    }
}

fn radius(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRadius { name, value })
    }
}

fn weight(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight { name, value })
    }
}

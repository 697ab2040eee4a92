use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::ConfigResult;
use crate::{behavior, wrap_coordinate, Boid, FlockConfig, Vector2D};

/// User input waiting to be applied before the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlockEvent {
    /// Left click: add a boid at this world position.
    Spawn(Vector2D),
    /// Right click: push boids away from this world position.
    Repel(Vector2D),
}

/// Owns the flock and advances it one discrete step at a time.
///
/// The random source is injected so that a seeded generator reproduces a
/// run exactly; [`FlockSimulator::with_seed`] uses a portable ChaCha stream.
#[derive(Debug, Clone)]
pub struct FlockSimulator<R = ChaCha8Rng> {
    boids: Vec<Boid>,
    config: FlockConfig,
    pending: VecDeque<FlockEvent>,
    frame: u64,
    rng: R,
}

impl FlockSimulator<ChaCha8Rng> {
    pub fn with_seed(config: FlockConfig, seed: u64) -> ConfigResult<Self> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> FlockSimulator<R> {
    /// Validates `config` and creates `config.initial_boids` random boids.
    pub fn new(config: FlockConfig, mut rng: R) -> ConfigResult<Self> {
        config.validate()?;

        let boids = (0..config.initial_boids)
            .map(|_| {
                let position = initial_position(&config, &mut rng);
                Boid::new(position, random_velocity(&mut rng, config.spawn_speed))
            })
            .collect();

        log::debug!(
            "Created flock of {} boids in a {}x{} world",
            config.initial_boids,
            config.width,
            config.height
        );

        Ok(Self {
            boids,
            config,
            pending: VecDeque::new(),
            frame: 0,
            rng,
        })
    }

    /// Validates `config` and adopts a known population as-is.
    pub fn from_boids(config: FlockConfig, boids: Vec<Boid>, rng: R) -> ConfigResult<Self> {
        config.validate()?;
        log::debug!("Adopted flock of {} boids", boids.len());

        Ok(Self {
            boids,
            config,
            pending: VecDeque::new(),
            frame: 0,
            rng,
        })
    }

    /// Advances every boid by one time unit.
    pub fn step(&mut self) {
        // Corrections read the previous frame only
        let corrections: Vec<Vector2D> = (0..self.boids.len())
            .map(|index| self.steering(index))
            .collect();

        let FlockConfig {
            width,
            height,
            max_speed,
            ..
        } = self.config;

        for (boid, correction) in self.boids.iter_mut().zip(corrections) {
            boid.update(correction, max_speed);
            boid.wrap_edges(width, height);
        }

        self.frame += 1;
        log::trace!("Frame {} stepped {} boids", self.frame, self.boids.len());
    }

    /// Appends a boid at `position` with a random heading. Returns its index,
    /// or `None` when the position is not finite and nothing was added.
    pub fn spawn(&mut self, position: Vector2D) -> Option<usize> {
        if !position.is_finite() {
            log::warn!("Ignoring spawn at non-finite position {:?}", position);
            return None;
        }

        let velocity = random_velocity(&mut self.rng, self.config.spawn_speed);
        self.boids.push(Boid::new(position, velocity));

        log::debug!(
            "Spawned boid at ({:.1}, {:.1}), flock size {}",
            position.x,
            position.y,
            self.boids.len()
        );
        Some(self.boids.len() - 1)
    }

    /// Pushes boids away from `origin`. Returns how many boids were affected.
    pub fn repel(&mut self, origin: Vector2D) -> usize {
        if !origin.is_finite() {
            log::warn!("Ignoring repel from non-finite position {:?}", origin);
            return 0;
        }

        let FlockConfig {
            max_speed,
            repel_radius,
            repel_strength,
            ..
        } = self.config;

        let mut affected = 0;
        for boid in self.boids.iter_mut() {
            if let Some(impulse) = behavior::repulsion(boid, origin, repel_radius, repel_strength) {
                boid.velocity += impulse;
                boid.velocity = boid.velocity.limit(max_speed);
                affected += 1;
            }
        }

        log::debug!(
            "Repelled {} boids from ({:.1}, {:.1})",
            affected,
            origin.x,
            origin.y
        );
        affected
    }

    /// Buffers an event until the next [`tick`](Self::tick).
    pub fn queue(&mut self, event: FlockEvent) {
        self.pending.push_back(event);
    }

    /// Applies all pending events in arrival order, then steps.
    pub fn tick(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.apply(event);
        }
        self.step();
    }

    pub fn apply(&mut self, event: FlockEvent) {
        match event {
            FlockEvent::Spawn(position) => {
                self.spawn(position);
            }
            FlockEvent::Repel(origin) => {
                self.repel(origin);
            }
        }
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    /// Read-only view of the flock for rendering.
    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Number of completed steps.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.config.width, self.config.height)
    }

    fn steering(&self, index: usize) -> Vector2D {
        let boid = &self.boids[index];
        let others = || {
            self.boids
                .iter()
                .enumerate()
                .filter(move |(other, _)| *other != index)
                .map(|(_, other)| other)
        };
        let config = &self.config;

        let separation = behavior::separation(boid, others(), config.separation_radius)
            .limit(config.max_rule_speed)
            * config.separation_weight;
        let alignment = behavior::alignment(boid, others(), config.alignment_radius)
            .limit(config.max_rule_speed)
            * config.alignment_weight;
        let cohesion = behavior::cohesion(boid, others(), config.cohesion_radius)
            .limit(config.max_rule_speed)
            * config.cohesion_weight;

        separation + alignment + cohesion
    }
}

fn initial_position<R: Rng>(config: &FlockConfig, rng: &mut R) -> Vector2D {
    let (x, y) = match config.initial_spread {
        Some(spread) => (
            config.width / 2.0 + (rng.gen::<f32>() - 0.5) * spread,
            config.height / 2.0 + (rng.gen::<f32>() - 0.5) * spread,
        ),
        None => (
            rng.gen::<f32>() * config.width,
            rng.gen::<f32>() * config.height,
        ),
    };
    Vector2D::new(
        wrap_coordinate(x, config.width),
        wrap_coordinate(y, config.height),
    )
}

fn random_velocity<R: Rng>(rng: &mut R, speed: f32) -> Vector2D {
    let angle = rng.gen::<f32>() * TAU;
    Vector2D::new(angle.sin(), angle.cos()) * speed
}

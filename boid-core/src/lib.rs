//! Core of the boids flocking simulation.
//!
//! [`FlockSimulator`] owns the flock and advances it one step at a time.
//! Rendering, input handling and frame scheduling live outside this crate;
//! callers hand in world coordinates and read positions back through
//! [`FlockSimulator::boids`].

mod config;
mod error;
mod simulator;

pub use config::FlockConfig;
pub use error::{ConfigError, ConfigResult};
pub use simulator::{FlockEvent, FlockSimulator};

/// A 2D vector used for position and velocity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag.is_infinite() {
            // Length overflows f32; shrink by the largest component first
            return (*self / self.x.abs().max(self.y.abs())).normalize();
        }
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Scales the vector down to `max` if it is longer, otherwise returns it untouched.
    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag <= max {
            return *self;
        }
        let scaled = if mag.is_finite() {
            *self * (max / mag)
        } else {
            self.normalize() * max
        };
        // rounding can leave the result a few ulps above `max`
        if scaled.magnitude() > max {
            scaled * (1.0 - 4.0 * f32::EPSILON)
        } else {
            scaled
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// A single boid entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    /// Unit vector along the velocity, zero for a boid at rest.
    pub fn heading(&self) -> Vector2D {
        self.velocity.normalize()
    }

    /// Adds `correction` to the velocity, clamps the speed, then moves.
    pub fn update(&mut self, correction: Vector2D, max_speed: f32) {
        self.velocity += correction;
        self.velocity = self.velocity.limit(max_speed);
        self.position += self.velocity;
    }

    /// Toroidal wrap into `[0, width) x [0, height)`.
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        self.position.x = wrap_coordinate(self.position.x, width);
        self.position.y = wrap_coordinate(self.position.y, height);
    }
}

fn wrap_coordinate(value: f32, bound: f32) -> f32 {
    let wrapped = value.rem_euclid(bound);
    // rem_euclid of a tiny negative value rounds up to `bound`
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}

/// The three flocking rules plus the repel impulse.
///
/// Each rule scans `others`, which must not contain `boid` itself, and
/// returns the exact zero vector when no other boid is in range.
pub mod behavior {
    use super::*;

    /// Unit vector pointing away from crowding neighbours, each weighted by
    /// the inverse of its distance.
    pub fn separation<'a, I>(boid: &Boid, others: I, radius: f32) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut away = Vector2D::zero();

        for other in others {
            let distance = boid.position.distance(&other.position);
            // Coincident boids have no direction to push along
            if distance > 0.0 && distance < radius {
                let weight = distance.recip().min(f32::MAX);
                away += (boid.position - other.position).normalize() * weight;
            }
        }

        away.normalize()
    }

    /// Difference between the neighbours' mean velocity and the boid's own.
    pub fn alignment<'a, I>(boid: &Boid, others: I, radius: f32) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            if boid.position.distance(&other.position) < radius {
                sum += other.velocity;
                count += 1;
            }
        }

        if count > 0 {
            sum / count as f32 - boid.velocity
        } else {
            Vector2D::zero()
        }
    }

    /// Vector from the boid to the neighbours' centre of mass.
    pub fn cohesion<'a, I>(boid: &Boid, others: I, radius: f32) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            if boid.position.distance(&other.position) < radius {
                sum += other.position;
                count += 1;
            }
        }

        if count > 0 {
            sum / count as f32 - boid.position
        } else {
            Vector2D::zero()
        }
    }

    /// Impulse pushing `boid` directly away from `origin`, scaled by the
    /// inverse of the distance. `None` when the boid sits on `origin` or
    /// lies beyond `radius`.
    pub fn repulsion(
        boid: &Boid,
        origin: Vector2D,
        radius: Option<f32>,
        strength: f32,
    ) -> Option<Vector2D> {
        let distance = boid.position.distance(&origin);
        if distance <= 0.0 || radius.is_some_and(|r| distance > r) {
            return None;
        }
        let scale = (strength / distance).min(f32::MAX);
        Some((boid.position - origin).normalize() * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector2d_new() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.x, 3.0);
        assert_eq!(v.y, 4.0);
    }

    #[test]
    fn test_vector2d_magnitude() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
    }

    #[test]
    fn test_vector2d_normalize() {
        let v = Vector2D::new(3.0, 4.0);
        let normalized = v.normalize();
        assert!((normalized.magnitude() - 1.0).abs() < 0.0001);
        assert_eq!(Vector2D::zero().normalize(), Vector2D::zero());
    }

    #[test]
    fn test_vector2d_limit() {
        let short = Vector2D::new(0.3, 0.4);
        assert_eq!(short.limit(1.0), short);

        let long = Vector2D::new(30.0, 40.0).limit(5.0);
        assert!(long.magnitude() <= 5.0);
        assert!((long.magnitude() - 5.0).abs() < 0.0001);
        assert!((long.x - 3.0).abs() < 0.0001);
    }

    #[test]
    fn test_vector2d_huge_components() {
        let huge = Vector2D::new(0.0, 1.0e21);
        assert_eq!(huge.magnitude(), 1.0e21);
        assert_eq!(huge.normalize(), Vector2D::new(0.0, 1.0));

        let limited = huge.limit(2.0);
        assert!(limited.y > 1.99 && limited.y <= 2.0);

        // Length itself overflows f32
        let diagonal = Vector2D::new(f32::MAX, f32::MAX);
        let unit = diagonal.normalize();
        assert!((unit.magnitude() - 1.0).abs() < 0.0001);
        let limited = diagonal.limit(3.0);
        assert!(limited.magnitude() <= 3.0 && limited.magnitude() > 2.99);
    }

    #[test]
    fn test_vector2d_operations() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        let sum = v1 + v2;
        assert_eq!(sum.x, 4.0);
        assert_eq!(sum.y, 6.0);

        let diff = v2 - v1;
        assert_eq!(diff.x, 2.0);
        assert_eq!(diff.y, 2.0);

        let scaled = v1 * 2.0;
        assert_eq!(scaled.x, 2.0);
        assert_eq!(scaled.y, 4.0);

        assert_eq!(v1.dot(&v2), 11.0);
    }

    #[test]
    fn test_boid_update() {
        let mut boid = Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 1.0));

        boid.update(Vector2D::zero(), 10.0);

        assert_eq!(boid.position, Vector2D::new(1.0, 1.0));
    }

    #[test]
    fn test_boid_update_clamps_speed() {
        let mut boid = Boid::new(Vector2D::zero(), Vector2D::new(1.0, 0.0));

        boid.update(Vector2D::new(9.0, 0.0), 2.0);

        assert_eq!(boid.velocity, Vector2D::new(2.0, 0.0));
        assert_eq!(boid.position, Vector2D::new(2.0, 0.0));
    }

    #[test]
    fn test_boid_wrap_edges() {
        let mut boid = Boid::new(Vector2D::new(-1.0, 101.0), Vector2D::zero());

        boid.wrap_edges(100.0, 100.0);

        assert_eq!(boid.position, Vector2D::new(99.0, 1.0));
    }

    #[test]
    fn test_boid_wrap_edges_upper_bound_is_exclusive() {
        let mut boid = Boid::new(Vector2D::new(100.0, -1.0e-9), Vector2D::zero());

        boid.wrap_edges(100.0, 100.0);

        assert_eq!(boid.position.x, 0.0);
        assert!(boid.position.y < 100.0);
    }

    #[test]
    fn test_heading() {
        let boid = Boid::new(Vector2D::zero(), Vector2D::new(0.0, -3.0));
        assert_eq!(boid.heading(), Vector2D::new(0.0, -1.0));

        let resting = Boid::new(Vector2D::zero(), Vector2D::zero());
        assert_eq!(resting.heading(), Vector2D::zero());
    }

    #[test]
    fn test_rules_without_neighbours_are_zero() {
        let boid = Boid::new(Vector2D::new(10.0, 10.0), Vector2D::new(1.0, 0.0));
        let far = [Boid::new(Vector2D::new(90.0, 90.0), Vector2D::new(0.0, 1.0))];

        assert_eq!(behavior::separation(&boid, far.iter(), 25.0), Vector2D::zero());
        assert_eq!(behavior::alignment(&boid, far.iter(), 50.0), Vector2D::zero());
        assert_eq!(behavior::cohesion(&boid, far.iter(), 50.0), Vector2D::zero());
        assert_eq!(behavior::separation(&boid, [].iter(), 25.0), Vector2D::zero());
    }

    #[test]
    fn test_separation_points_away() {
        let boid = Boid::new(Vector2D::new(10.0, 10.0), Vector2D::zero());
        let others = [
            Boid::new(Vector2D::new(14.0, 10.0), Vector2D::zero()),
            Boid::new(Vector2D::new(10.0, 10.0), Vector2D::zero()),
        ];

        let steer = behavior::separation(&boid, others.iter(), 25.0);

        assert_eq!(steer, Vector2D::new(-1.0, 0.0));
    }

    #[test]
    fn test_separation_prefers_closer_neighbour() {
        let boid = Boid::new(Vector2D::new(50.0, 50.0), Vector2D::zero());
        let others = [
            Boid::new(Vector2D::new(52.0, 50.0), Vector2D::zero()),
            Boid::new(Vector2D::new(40.0, 50.0), Vector2D::zero()),
        ];

        let steer = behavior::separation(&boid, others.iter(), 25.0);

        // 1/2 to the left beats 1/10 to the right
        assert!(steer.x < 0.0);
        assert!((steer.magnitude() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_separation_from_near_coincident_neighbour() {
        let boid = Boid::new(Vector2D::zero(), Vector2D::zero());
        let others = [Boid::new(Vector2D::new(1.0e-20, 0.0), Vector2D::zero())];

        let steer = behavior::separation(&boid, others.iter(), 25.0);

        assert_eq!(steer, Vector2D::new(-1.0, 0.0));
    }

    #[test]
    fn test_alignment_and_cohesion() {
        let boid = Boid::new(Vector2D::new(10.0, 10.0), Vector2D::new(1.0, 0.0));
        let others = [
            Boid::new(Vector2D::new(20.0, 10.0), Vector2D::new(0.0, 1.0)),
            Boid::new(Vector2D::new(10.0, 20.0), Vector2D::new(0.0, 1.0)),
        ];

        let align = behavior::alignment(&boid, others.iter(), 50.0);
        assert_eq!(align, Vector2D::new(-1.0, 1.0));

        let cohere = behavior::cohesion(&boid, others.iter(), 50.0);
        assert_eq!(cohere, Vector2D::new(5.0, 5.0));
    }

    #[test]
    fn test_repulsion_radius_and_origin() {
        let boid = Boid::new(Vector2D::new(10.0, 0.0), Vector2D::zero());

        let impulse = behavior::repulsion(&boid, Vector2D::zero(), None, 10.0).unwrap();
        assert_eq!(impulse, Vector2D::new(1.0, 0.0));

        assert!(behavior::repulsion(&boid, Vector2D::zero(), Some(5.0), 10.0).is_none());
        assert!(behavior::repulsion(&boid, Vector2D::new(10.0, 0.0), None, 10.0).is_none());
    }

    #[test]
    fn test_repulsion_saturates_instead_of_overflowing() {
        let boid = Boid::new(Vector2D::new(0.0, 1.0e-3), Vector2D::zero());

        let impulse = behavior::repulsion(&boid, Vector2D::zero(), None, 1.0e38).unwrap();

        assert!(impulse.is_finite());
        assert_eq!(impulse, Vector2D::new(0.0, f32::MAX));
    }
}

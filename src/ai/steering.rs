//! Steering for AI movement
//!
//! Computes a per-tick movement direction from a target-seeking vector and
//! an obstacle-avoidance vector, turns the agent's heading toward it at a
//! bounded rate, and integrates vertical fall. All obstacle sensing goes
//! through [`SpatialQuery`].

use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::spatial::{ObstacleFilter, SpatialQuery};

/// Downward velocity applied while grounded, keeps ground contact stable.
const GROUND_STICK: f32 = -2.0;

/// Horizontal direction from `position` to `target` (vertical ignored).
///
/// Returns zero when the target is directly above/below or coincident.
#[must_use]
pub fn seek(position: Vec3, target: Vec3) -> Vec3 {
    let mut to_target = target - position;
    to_target.y = 0.0;
    to_target.normalize_or_zero()
}

/// A fan of obstacle probes spread across a field of view.
///
/// Directions are recomputed from the current heading every tick; nothing
/// here is persisted.
#[derive(Debug, Clone, Copy)]
pub struct SensorFan {
    /// Number of probes in the fan.
    pub ray_count: usize,
    /// Total fan angle in radians.
    pub field_of_view: f32,
    /// Obstacles beyond this distance are ignored.
    pub detection_radius: f32,
    /// Sphere radius for each sweep; zero degenerates to a raycast.
    pub probe_radius: f32,
    /// Extra weight for probes near the fan center, 0.0 = uniform.
    pub center_bias: f32,
}

impl SensorFan {
    /// Probe directions for the given heading, spread evenly across the
    /// field of view and rotated around the world up axis.
    #[must_use]
    pub fn directions(&self, heading: Vec3) -> SmallVec<[Vec3; 16]> {
        let mut dirs = SmallVec::new();
        if self.ray_count == 0 {
            return dirs;
        }
        if self.ray_count == 1 {
            dirs.push(heading);
            return dirs;
        }

        let half_fov = self.field_of_view * 0.5;
        let step = self.field_of_view / (self.ray_count - 1) as f32;
        for i in 0..self.ray_count {
            let angle = -half_fov + step * i as f32;
            dirs.push(Quat::from_rotation_y(angle) * heading);
        }
        dirs
    }

    /// Accumulated repulsion from every obstacle the fan hits.
    ///
    /// Each hit contributes a horizontal push from the hit point back to the
    /// agent, weighted by `1 - distance / detection_radius` and scaled down
    /// toward the fan edges when `center_bias` is set.
    #[must_use]
    pub fn avoidance(
        &self,
        query: &dyn SpatialQuery,
        origin: Vec3,
        heading: Vec3,
        filter: ObstacleFilter,
    ) -> Vec3 {
        let mut avoidance = Vec3::ZERO;
        let half_fov = (self.field_of_view * 0.5).max(f32::EPSILON);
        let step = if self.ray_count > 1 {
            self.field_of_view / (self.ray_count - 1) as f32
        } else {
            0.0
        };

        for (i, dir) in self.directions(heading).into_iter().enumerate() {
            let Some(hit) = query.probe(
                origin,
                dir,
                self.probe_radius,
                self.detection_radius,
                filter,
            ) else {
                continue;
            };

            let proximity = 1.0 - (hit.distance / self.detection_radius).clamp(0.0, 1.0);
            let angle = -half_fov + step * i as f32;
            let centering = 1.0 - self.center_bias * (angle.abs() / half_fov).min(1.0);

            let mut repulse = origin - hit.point;
            repulse.y = 0.0;
            avoidance += repulse.normalize_or_zero() * proximity * centering;
        }

        avoidance
    }
}

/// Per-agent steering state: the heading and the integrated fall velocity.
///
/// Everything else is derived fresh each tick from the inputs.
#[derive(Debug, Clone, Copy)]
pub struct Steering {
    heading: Vec3,
    vertical_velocity: f32,
}

impl Steering {
    /// Create steering state facing `heading` (falls back to -Z when the
    /// horizontal part is degenerate).
    #[must_use]
    pub fn new(heading: Vec3) -> Self {
        let mut flat = heading;
        flat.y = 0.0;
        let heading = if flat.length_squared() > f32::EPSILON {
            flat.normalize()
        } else {
            Vec3::NEG_Z
        };
        Self {
            heading,
            vertical_velocity: 0.0,
        }
    }

    /// Current horizontal heading (unit length).
    #[must_use]
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    /// Current integrated vertical velocity.
    #[must_use]
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Combine seek and avoidance into a desired direction.
    ///
    /// A near-zero sum (seek and repulsion cancelling out) holds the
    /// current heading instead of normalizing a degenerate vector.
    #[must_use]
    pub fn desired_direction(&self, seek: Vec3, avoidance: Vec3, avoidance_strength: f32) -> Vec3 {
        let combined = seek + avoidance * avoidance_strength;
        if combined.length_squared() > 1e-4 {
            combined.normalize()
        } else {
            self.heading
        }
    }

    /// Rotate the heading toward `desired` by at most `rotation_speed`
    /// radians per second. Returns the new heading.
    pub fn turn_towards(&mut self, desired: Vec3, rotation_speed: f32, dt: f32) -> Vec3 {
        let mut flat = desired;
        flat.y = 0.0;
        let desired = flat.normalize_or_zero();
        if desired == Vec3::ZERO {
            return self.heading;
        }

        let dot = self.heading.dot(desired).clamp(-1.0, 1.0);
        let cross_y = self.heading.cross(desired).y;
        let angle = cross_y.atan2(dot);

        let max_step = rotation_speed * dt;
        let step = angle.clamp(-max_step, max_step);

        self.heading = (Quat::from_rotation_y(step) * self.heading).normalize();
        self.heading
    }

    /// Integrate fall for this tick and return the vertical displacement.
    ///
    /// While grounded the velocity is pinned to a small downward bias so the
    /// mover stays in contact with the floor.
    pub fn fall(&mut self, gravity: f32, grounded: bool, dt: f32) -> f32 {
        if grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = GROUND_STICK;
        }
        self.vertical_velocity += gravity * dt;
        self.vertical_velocity * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::ProbeHit;

    /// Query backend with a single point obstacle: any probe whose direction
    /// passes near the obstacle reports a hit at its distance.
    struct PointObstacle {
        position: Vec3,
        half_angle: f32,
    }

    impl SpatialQuery for PointObstacle {
        fn probe(
            &self,
            origin: Vec3,
            direction: Vec3,
            _radius: f32,
            max_distance: f32,
            _filter: ObstacleFilter,
        ) -> Option<ProbeHit> {
            let to_obstacle = self.position - origin;
            let distance = to_obstacle.length();
            if distance > max_distance {
                return None;
            }
            let angle = direction.angle_between(to_obstacle.normalize_or_zero());
            (angle <= self.half_angle).then_some(ProbeHit {
                distance,
                point: self.position,
            })
        }
    }

    fn fan() -> SensorFan {
        SensorFan {
            ray_count: 9,
            field_of_view: 120f32.to_radians(),
            detection_radius: 3.0,
            probe_radius: 0.0,
            center_bias: 0.0,
        }
    }

    #[test]
    fn test_seek_is_horizontal_unit() {
        let dir = seek(Vec3::ZERO, Vec3::new(3.0, 10.0, 4.0));
        assert!(dir.y.abs() < 1e-6);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_seek_degenerate_is_zero() {
        assert_eq!(seek(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_fan_direction_count_and_spread() {
        let dirs = fan().directions(Vec3::NEG_Z);
        assert_eq!(dirs.len(), 9);

        // Outermost probes sit at +/- half the field of view.
        let half = 60f32.to_radians();
        assert!((dirs[0].angle_between(Vec3::NEG_Z) - half).abs() < 1e-4);
        assert!((dirs[8].angle_between(Vec3::NEG_Z) - half).abs() < 1e-4);
        // Center probe points forward.
        assert!(dirs[4].angle_between(Vec3::NEG_Z) < 1e-4);
    }

    #[test]
    fn test_single_probe_fan_points_forward() {
        let mut f = fan();
        f.ray_count = 1;
        let dirs = f.directions(Vec3::X);
        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].angle_between(Vec3::X) < 1e-5);
    }

    #[test]
    fn test_touching_obstacle_full_weight_repulsion() {
        // Obstacle effectively at the agent: the center probe hits at
        // distance ~0, every other probe stays clear.
        let query = PointObstacle {
            position: Vec3::new(0.0, 0.0, -1e-6),
            half_angle: 0.01,
        };
        let avoidance = fan().avoidance(&query, Vec3::ZERO, Vec3::NEG_Z, ObstacleFilter::all());

        // Repulsion points away from the hit (+Z) with weight ~= 1.
        assert!(avoidance.z > 0.99, "avoidance was {avoidance}");
        assert!(avoidance.x.abs() < 1e-4);
        assert!((avoidance.length() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_avoidance_weight_scales_with_proximity() {
        let near = PointObstacle {
            position: Vec3::new(0.0, 0.0, -0.5),
            half_angle: 0.01,
        };
        let far = PointObstacle {
            position: Vec3::new(0.0, 0.0, -2.5),
            half_angle: 0.01,
        };
        let f = fan();
        let strong = f.avoidance(&near, Vec3::ZERO, Vec3::NEG_Z, ObstacleFilter::all());
        let weak = f.avoidance(&far, Vec3::ZERO, Vec3::NEG_Z, ObstacleFilter::all());
        assert!(strong.length() > weak.length());
    }

    #[test]
    fn test_center_bias_downweights_edge_probes() {
        // Obstacle on the fan edge; with full bias that probe is muted.
        let query = PointObstacle {
            position: Quat::from_rotation_y(-60f32.to_radians()) * Vec3::NEG_Z,
            half_angle: 0.05,
        };
        let uniform = fan();
        let mut biased = fan();
        biased.center_bias = 1.0;

        let plain = uniform.avoidance(&query, Vec3::ZERO, Vec3::NEG_Z, ObstacleFilter::all());
        let muted = biased.avoidance(&query, Vec3::ZERO, Vec3::NEG_Z, ObstacleFilter::all());
        assert!(muted.length() < plain.length());
    }

    #[test]
    fn test_desired_direction_never_nan() {
        let steering = Steering::new(Vec3::NEG_Z);

        // Seek and avoidance cancel exactly: hold heading instead.
        let dir = steering.desired_direction(Vec3::X, Vec3::NEG_X, 1.0);
        assert!(dir.is_finite());
        assert_eq!(dir, Vec3::NEG_Z);

        let dir = steering.desired_direction(Vec3::ZERO, Vec3::ZERO, 2.5);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_turn_rate_is_bounded() {
        let mut steering = Steering::new(Vec3::NEG_Z);
        // Request a 90 degree turn with a budget of ~5.7 degrees.
        let rate = 1.0; // rad/s
        let dt = 0.1;
        steering.turn_towards(Vec3::NEG_X, rate, dt);
        let turned = steering.heading().angle_between(Vec3::NEG_Z);
        assert!((turned - rate * dt).abs() < 1e-4);
    }

    #[test]
    fn test_turn_converges_on_desired() {
        let mut steering = Steering::new(Vec3::NEG_Z);
        for _ in 0..100 {
            steering.turn_towards(Vec3::X, 4.0, 0.05);
        }
        assert!(steering.heading().angle_between(Vec3::X) < 1e-3);
    }

    #[test]
    fn test_fall_accumulates_and_resets_on_ground() {
        let mut steering = Steering::new(Vec3::NEG_Z);
        let dt = 1.0 / 60.0;

        // Airborne: displacement grows more negative each tick.
        let first = steering.fall(-9.81, false, dt);
        let second = steering.fall(-9.81, false, dt);
        assert!(second < first);

        // Landing pins the velocity back to the ground-stick bias.
        steering.fall(-9.81, true, dt);
        assert!((steering.vertical_velocity() - (GROUND_STICK + -9.81 * dt)).abs() < 1e-4);
    }
}

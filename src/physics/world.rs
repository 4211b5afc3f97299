//! Static obstacle world and kinematic character mover

use glam::Vec3;
use rapier3d::control::KinematicCharacterController;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::spatial::{
    MotionIntegrator, MoveResult, ObstacleCategory, ObstacleFilter, ProbeHit, SpatialQuery,
};

/// Nominal tick length handed to the character controller for its snapping
/// heuristics; the gameplay dt lives in the displacement itself.
const CONTROLLER_DT: f32 = 1.0 / 60.0;

fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_glam(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn category_group(category: ObstacleCategory) -> Group {
    Group::from_bits_truncate(1 << category.index())
}

fn filter_mask(filter: ObstacleFilter) -> Group {
    let mut mask = Group::NONE;
    for category in ObstacleCategory::ALL {
        if filter.accepts(category) {
            mask |= category_group(category);
        }
    }
    mask
}

fn query_filter(filter: ObstacleFilter) -> QueryFilter<'static> {
    QueryFilter::default().groups(InteractionGroups::new(Group::ALL, filter_mask(filter)))
}

/// Static level geometry answering spatial probes.
pub struct ObstacleWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    query_pipeline: QueryPipeline,
}

impl ObstacleWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    fn insert(&mut self, position: Vec3, collider: ColliderBuilder, category: ObstacleCategory) {
        let body = RigidBodyBuilder::fixed()
            .translation(to_na(position))
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = collider
            .collision_groups(InteractionGroups::new(category_group(category), Group::ALL))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a flat ground slab centered at `center`.
    pub fn add_ground(&mut self, center: Vec3, half_extent: f32) {
        self.insert(
            center,
            ColliderBuilder::cuboid(half_extent, 0.1, half_extent),
            ObstacleCategory::Terrain,
        );
    }

    /// Add an axis-aligned wall or block.
    pub fn add_wall(&mut self, center: Vec3, half_extents: Vec3) {
        self.insert(
            center,
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z),
            ObstacleCategory::Structure,
        );
    }

    /// Add a spherical prop.
    pub fn add_prop(&mut self, center: Vec3, radius: f32) {
        self.insert(center, ColliderBuilder::ball(radius), ObstacleCategory::Prop);
    }

    /// Resolve a character move against the static geometry.
    fn move_character(
        &self,
        shape: &Capsule,
        position: Vec3,
        displacement: Vec3,
    ) -> (Vec3, bool) {
        let controller = KinematicCharacterController::default();
        let movement = controller.move_shape(
            CONTROLLER_DT,
            &self.rigid_body_set,
            &self.collider_set,
            &self.query_pipeline,
            shape,
            &Isometry::translation(position.x, position.y, position.z),
            to_na(displacement),
            query_filter(ObstacleFilter::solid()),
            |_| {},
        );
        (to_glam(&movement.translation), movement.grounded)
    }
}

impl Default for ObstacleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialQuery for ObstacleWorld {
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
        filter: ObstacleFilter,
    ) -> Option<ProbeHit> {
        let filter = query_filter(filter);

        if radius <= 0.0 {
            let ray = Ray::new(
                point![origin.x, origin.y, origin.z],
                to_na(direction),
            );
            return self
                .query_pipeline
                .cast_ray(
                    &self.rigid_body_set,
                    &self.collider_set,
                    &ray,
                    max_distance,
                    true,
                    filter,
                )
                .map(|(_, distance)| {
                    let point = ray.point_at(distance);
                    ProbeHit {
                        distance,
                        point: Vec3::new(point.x, point.y, point.z),
                    }
                });
        }

        let shape = Ball::new(radius);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            ..Default::default()
        };
        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &Isometry::translation(origin.x, origin.y, origin.z),
                &to_na(direction),
                &shape,
                options,
                filter,
            )
            .map(|(_, hit)| {
                let distance = hit.time_of_impact;
                // Approximate the contact at the sweep-direction edge of
                // the sphere when it stops.
                let point = origin + direction * distance + direction * radius;
                ProbeHit { distance, point }
            })
    }
}

/// Kinematic character: a capsule moved through the obstacle world with
/// collide-and-slide resolution.
pub struct CharacterBody<'a> {
    world: &'a ObstacleWorld,
    shape: Capsule,
    position: Vec3,
    grounded: bool,
}

impl<'a> CharacterBody<'a> {
    /// Create a character at `position` (capsule center).
    #[must_use]
    pub fn new(world: &'a ObstacleWorld, position: Vec3, half_height: f32, radius: f32) -> Self {
        Self {
            world,
            shape: Capsule::new_y(half_height, radius),
            position,
            grounded: false,
        }
    }

    /// Whether the last move ended on the ground.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }
}

impl MotionIntegrator for CharacterBody<'_> {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn move_by(&mut self, displacement: Vec3) -> MoveResult {
        let (applied, grounded) = self
            .world
            .move_character(&self.shape, self.position, displacement);
        self.position += applied;
        self.grounded = grounded;
        MoveResult { grounded }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ground slab plus one wall two units in front of the origin.
    fn walled_world() -> ObstacleWorld {
        let mut world = ObstacleWorld::new();
        world.add_ground(Vec3::new(0.0, -0.1, 0.0), 50.0);
        world.add_wall(Vec3::new(0.0, 1.0, -2.0), Vec3::new(4.0, 1.0, 0.25));
        world
    }

    #[test]
    fn test_ray_probe_reports_wall_distance() {
        let world = walled_world();
        let hit = world
            .probe(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::NEG_Z,
                0.0,
                10.0,
                ObstacleFilter::blocking(),
            )
            .expect("wall in front should be hit");

        assert!((hit.distance - 1.75).abs() < 0.01);
        assert!((hit.point.z - (-1.75)).abs() < 0.01);
    }

    #[test]
    fn test_probe_respects_max_distance() {
        let world = walled_world();
        assert!(
            world
                .probe(
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::NEG_Z,
                    0.0,
                    1.0,
                    ObstacleFilter::blocking(),
                )
                .is_none()
        );
    }

    #[test]
    fn test_probe_filter_excludes_categories() {
        let mut world = ObstacleWorld::new();
        world.add_prop(Vec3::new(0.0, 0.5, -3.0), 0.5);

        let origin = Vec3::new(0.0, 0.5, 0.0);
        assert!(
            world
                .probe(origin, Vec3::NEG_Z, 0.0, 10.0, ObstacleFilter::blocking())
                .is_some()
        );
        // Structure-only filter must not see the prop.
        let structure_only =
            ObstacleFilter::none().with(ObstacleCategory::Structure);
        assert!(
            world
                .probe(origin, Vec3::NEG_Z, 0.0, 10.0, structure_only)
                .is_none()
        );
    }

    #[test]
    fn test_sphere_probe_hits_earlier_than_ray() {
        let world = walled_world();
        let origin = Vec3::new(0.0, 1.0, 0.0);

        let ray = world
            .probe(origin, Vec3::NEG_Z, 0.0, 10.0, ObstacleFilter::blocking())
            .unwrap();
        let sphere = world
            .probe(origin, Vec3::NEG_Z, 0.4, 10.0, ObstacleFilter::blocking())
            .unwrap();
        // The sphere surface reaches the wall before its center does.
        assert!(sphere.distance < ray.distance);
    }

    #[test]
    fn test_character_stops_at_wall() {
        let world = walled_world();
        let mut body = CharacterBody::new(&world, Vec3::new(0.0, 1.0, 0.0), 0.6, 0.4);

        // March straight into the wall.
        for _ in 0..120 {
            body.move_by(Vec3::new(0.0, 0.0, -0.05));
        }
        // Stopped at the wall face (z = -1.75) minus the capsule radius,
        // never inside it.
        assert!(body.position().z > -1.8);
        assert!(body.position().z < -0.5, "character never moved");
    }

    #[test]
    fn test_character_grounds_on_terrain() {
        let world = walled_world();
        let mut body = CharacterBody::new(&world, Vec3::new(5.0, 3.0, 5.0), 0.6, 0.4);

        let mut grounded = false;
        for _ in 0..300 {
            let result = body.move_by(Vec3::new(0.0, -0.05, 0.0));
            if result.grounded {
                grounded = true;
                break;
            }
        }
        assert!(grounded, "falling character never grounded");
        // Resting on the slab: capsule center at ground + leg length.
        assert!(body.position().y > 0.5);
    }
}

//! Game session glue
//!
//! [`GameSession`] is the explicitly constructed object that the original
//! singleton managers collapse into: it owns the entity world, the score
//! and end-of-game latch, the collectible loop, and the scene flow, and it
//! routes gameplay events between them. Everything engine-shaped is passed
//! in by the caller each tick.

mod collectibles;
mod events;
mod picker;
mod transition;
mod triggers;

pub use collectibles::CollectibleSpawner;
pub use events::{EventQueue, GameEvent};
pub use picker::NonRepeating;
pub use transition::{SceneFlow, SceneLoader};
pub use triggers::ContactTrigger;

use glam::Vec3;
use hecs::Entity;
use rand::Rng;

use crate::ai::{BehaviorState, EnemyAgent, PatrolRoute};
use crate::config::GameConfig;
use crate::ecs::World;
use crate::spatial::{MotionIntegrator, SpatialQuery};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The enemy caught the player.
    Caught,
    /// The player reached the target score.
    Won,
}

/// One run of the game: entities, score, enemy, collectibles, scene flow.
pub struct GameSession {
    config: GameConfig,
    world: World,
    player: Entity,
    enemy: Entity,
    events: EventQueue,
    spawner: CollectibleSpawner,
    flow: SceneFlow,
    last_enemy_state: BehaviorState,
    outcome: Option<SessionOutcome>,
}

impl GameSession {
    /// Build a session from authored config.
    ///
    /// Invalid sections are reported once and degrade: a bad agent config
    /// leaves the enemy inert, missing spawn points leave the collectible
    /// loop inert, and a bad session section falls back to defaults.
    #[must_use]
    pub fn new(mut config: GameConfig) -> Self {
        if let Err(e) = config.session.validate() {
            log::error!("session rules rejected ({e}); using defaults");
            config.session = Default::default();
        }

        let mut world = World::new();
        let player = world.spawn_player(config.level.player_spawn);

        let route = PatrolRoute::new(config.level.waypoints.clone(), config.agent.patrol_mode);
        let agent = EnemyAgent::new(config.agent.clone(), route, Vec3::NEG_Z);
        let enemy = world.spawn_enemy(config.level.enemy_spawn, agent);

        let spawner = CollectibleSpawner::new(
            config.level.spawn_points.clone(),
            config.session.target_score,
            config.session.gather_radius,
        );
        let flow = SceneFlow::new(config.session.fade_duration);

        Self {
            config,
            world,
            player,
            enemy,
            events: EventQueue::new(),
            spawner,
            flow,
            last_enemy_state: BehaviorState::Idle,
            outcome: None,
        }
    }

    /// Place the first collectible. Call once before ticking.
    pub fn start(&mut self, rng: &mut impl Rng) {
        log::info!(
            "session started: {} collectibles to win",
            self.spawner.target_score()
        );
        self.spawner.spawn_first(rng, &mut self.events);
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.spawner.score()
    }

    /// How the session ended, if it has.
    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// Whether a terminal event has latched.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Fade overlay opacity for rendering.
    #[must_use]
    pub fn fade_alpha(&self) -> f32 {
        self.flow.alpha()
    }

    /// Events readable this frame, for external consumers (audio, UI).
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// The entity world, for rendering and inspection.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Player position, if the player entity still exists.
    #[must_use]
    pub fn player_position(&self) -> Option<Vec3> {
        self.world.position(self.player)
    }

    /// Move the player; their motion is resolved by the caller (input,
    /// script, or replay).
    pub fn set_player_position(&mut self, position: Vec3) {
        self.world.set_position(self.player, position);
    }

    /// Remove the player entity; the enemy goes idle until one exists
    /// again.
    pub fn remove_player(&mut self) {
        let _ = self.world.despawn(self.player);
    }

    /// Position of the collectible currently in the level.
    #[must_use]
    pub fn collectible_position(&self) -> Option<Vec3> {
        self.spawner.active_position()
    }

    /// Advance the whole session one tick.
    ///
    /// `spatial` answers the enemy's obstacle probes, `enemy_mover` owns
    /// the enemy's collision-resolved position, and `loader` performs scene
    /// swaps once the fade completes.
    pub fn tick(
        &mut self,
        spatial: &dyn SpatialQuery,
        enemy_mover: &mut dyn MotionIntegrator,
        loader: &mut dyn SceneLoader,
        dt: f32,
        rng: &mut impl Rng,
    ) {
        // Last frame's events become readable; mirror them into entities.
        self.events.swap();
        self.sync_collectible_entities();

        let target = self.player_position();

        // Enemy tick. The catch latches immediately so nothing else can
        // fire afterwards.
        let report = {
            let mut agent = self
                .world
                .get_mut::<EnemyAgent>(self.enemy)
                .expect("enemy entity always has an agent");
            agent.tick(target, spatial, enemy_mover, dt, rng)
        };
        let heading = self
            .world
            .get::<EnemyAgent>(self.enemy)
            .map(|a| a.heading())
            .unwrap_or(Vec3::NEG_Z);
        self.world
            .place_facing(self.enemy, enemy_mover.position(), heading);

        if report.state != self.last_enemy_state {
            self.events.push(GameEvent::EnemyStateChanged {
                state: report.state.name(),
            });
            if report.state == BehaviorState::Chase {
                self.events.push(GameEvent::PlaySound {
                    name: "alert",
                    volume: 1.0,
                });
            }
            self.last_enemy_state = report.state;
        }

        if report.caught && self.outcome.is_none() {
            self.outcome = Some(SessionOutcome::Caught);
            self.events.push(GameEvent::PlayerCaught {
                position: enemy_mover.position(),
            });
            self.events.push(GameEvent::PlaySound {
                name: "caught",
                volume: 1.0,
            });
            self.events.push(GameEvent::SceneRequested {
                scene: self.config.session.lose_scene.clone(),
            });
            self.flow.request(self.config.session.lose_scene.clone());
        }

        // Collectible loop; the win latches the same way the catch does.
        let ended = self.is_over();
        if let Some(player) = target {
            self.spawner.tick(player, ended, rng, &mut self.events);
        }
        if self.outcome.is_none() && self.spawner.score() >= self.spawner.target_score() {
            self.outcome = Some(SessionOutcome::Won);
            self.events.push(GameEvent::SceneRequested {
                scene: self.config.session.win_scene.clone(),
            });
            self.flow.request(self.config.session.win_scene.clone());
        }

        self.flow.tick(dt, loader);
    }

    /// Keep collectible entities in step with spawner events.
    fn sync_collectible_entities(&mut self) {
        let mut spawned = Vec::new();
        let mut gathered = false;
        for event in self.events.iter() {
            match event {
                GameEvent::CollectibleSpawned { position, .. } => spawned.push(*position),
                GameEvent::CollectibleGathered { .. } => gathered = true,
                _ => {}
            }
        }

        if gathered {
            self.world.despawn_collectibles();
        }
        for position in spawned {
            self.world.spawn_collectible(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{MoveResult, ObstacleFilter, ProbeHit, SpatialQuery};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 0.05;

    struct OpenWorld;

    impl SpatialQuery for OpenWorld {
        fn probe(
            &self,
            _origin: Vec3,
            _direction: Vec3,
            _radius: f32,
            _max_distance: f32,
            _filter: ObstacleFilter,
        ) -> Option<ProbeHit> {
            None
        }
    }

    struct PlaneMover {
        position: Vec3,
    }

    impl MotionIntegrator for PlaneMover {
        fn position(&self) -> Vec3 {
            self.position
        }

        fn move_by(&mut self, displacement: Vec3) -> MoveResult {
            self.position += displacement;
            let grounded = self.position.y <= 0.0;
            if grounded {
                self.position.y = 0.0;
            }
            MoveResult { grounded }
        }
    }

    #[derive(Default)]
    struct RecordingLoader {
        loads: Vec<String>,
    }

    impl SceneLoader for RecordingLoader {
        fn load(&mut self, scene: &str) {
            self.loads.push(scene.to_string());
        }
    }

    fn test_config(enemy_spawn: Vec3, target_score: u32) -> GameConfig {
        let mut config = GameConfig::default();
        config.session.target_score = target_score;
        config.session.fade_duration = 0.5;
        config.level.player_spawn = Vec3::ZERO;
        config.level.enemy_spawn = enemy_spawn;
        config.level.spawn_points = vec![
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(-5.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, -5.0),
        ];
        config
    }

    /// Run one tick and append this frame's readable events to `seen`.
    fn step(
        session: &mut GameSession,
        mover: &mut PlaneMover,
        loader: &mut RecordingLoader,
        rng: &mut StdRng,
        seen: &mut Vec<GameEvent>,
    ) {
        session.tick(&OpenWorld, mover, loader, DT, rng);
        seen.extend(session.events().iter().cloned());
    }

    #[test]
    fn test_collecting_target_score_wins_once() {
        let mut session = GameSession::new(test_config(Vec3::new(200.0, 0.0, 200.0), 3));
        let mut mover = PlaneMover {
            position: Vec3::new(200.0, 0.0, 200.0),
        };
        let mut loader = RecordingLoader::default();
        let mut rng = StdRng::seed_from_u64(21);
        let mut seen = Vec::new();

        session.start(&mut rng);
        for _ in 0..60 {
            if let Some(collectible) = session.collectible_position() {
                session.set_player_position(collectible);
            }
            step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);
        }

        assert_eq!(session.outcome(), Some(SessionOutcome::Won));
        assert_eq!(session.score(), 3);
        assert_eq!(loader.loads, vec!["WinScene".to_string()]);

        let wins = seen
            .iter()
            .filter(|e| matches!(e, GameEvent::CourseWon { .. }))
            .count();
        assert_eq!(wins, 1);
        assert!(
            !seen
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerCaught { .. }))
        );
    }

    #[test]
    fn test_enemy_catch_ends_session_once() {
        let mut session = GameSession::new(test_config(Vec3::new(5.0, 0.0, 0.0), 100));
        let mut mover = PlaneMover {
            position: Vec3::new(5.0, 0.0, 0.0),
        };
        let mut loader = RecordingLoader::default();
        let mut rng = StdRng::seed_from_u64(33);
        let mut seen = Vec::new();

        session.start(&mut rng);
        for _ in 0..200 {
            step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);
        }

        assert_eq!(session.outcome(), Some(SessionOutcome::Caught));
        assert_eq!(loader.loads, vec!["EndScene".to_string()]);

        let catches = seen
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerCaught { .. }))
            .count();
        assert_eq!(catches, 1);
    }

    #[test]
    fn test_no_second_terminal_after_win() {
        let mut session = GameSession::new(test_config(Vec3::new(50.0, 0.0, 0.0), 1));
        let mut mover = PlaneMover {
            position: Vec3::new(50.0, 0.0, 0.0),
        };
        let mut loader = RecordingLoader::default();
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen = Vec::new();

        session.start(&mut rng);

        // Win immediately by standing on the first collectible.
        let collectible = session.collectible_position().unwrap();
        session.set_player_position(collectible);
        step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);
        assert_eq!(session.outcome(), Some(SessionOutcome::Won));

        // Now walk straight into the enemy; the latched session must not
        // raise a second terminal event or load a second scene.
        for _ in 0..60 {
            session.set_player_position(mover.position());
            step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);
        }

        assert_eq!(session.outcome(), Some(SessionOutcome::Won));
        assert_eq!(loader.loads, vec!["WinScene".to_string()]);
        assert!(
            !seen
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerCaught { .. }))
        );
    }

    #[test]
    fn test_collectible_entities_mirror_spawner() {
        let mut session = GameSession::new(test_config(Vec3::new(200.0, 0.0, 200.0), 5));
        let mut mover = PlaneMover {
            position: Vec3::new(200.0, 0.0, 200.0),
        };
        let mut loader = RecordingLoader::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = Vec::new();

        session.start(&mut rng);
        // First tick makes the spawn event readable and mirrors it.
        step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);
        assert_eq!(session.world().collectible_positions().len(), 1);

        // Gather, then let the mirror catch up: still exactly one entity,
        // now at the new position.
        let first = session.collectible_position().unwrap();
        session.set_player_position(first);
        step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);
        step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);

        let positions = session.world().collectible_positions();
        assert_eq!(positions.len(), 1);
        assert_ne!(positions[0], first);
    }

    #[test]
    fn test_removed_player_idles_enemy() {
        let mut session = GameSession::new(test_config(Vec3::new(5.0, 0.0, 0.0), 5));
        let mut mover = PlaneMover {
            position: Vec3::new(5.0, 0.0, 0.0),
        };
        let mut loader = RecordingLoader::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut seen = Vec::new();

        session.start(&mut rng);
        session.remove_player();

        for _ in 0..50 {
            step(&mut session, &mut mover, &mut loader, &mut rng, &mut seen);
        }

        assert!(session.outcome().is_none());
        // A targetless tick is a full no-op: the mover never moves.
        assert_eq!(mover.position, Vec3::new(5.0, 0.0, 0.0));
    }
}

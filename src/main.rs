//! Headless demo session
//!
//! Runs a full game session at a fixed timestep without a window: a
//! scripted player runs for the collectibles while the enemy patrols,
//! chases, and steers around the level geometry. Ends when a scene load
//! is issued or the time limit runs out.

use pursuit::audio::AudioPlayer;
use pursuit::prelude::*;

/// Scene loader that just records the request; a real build would swap
/// scenes here.
#[derive(Default)]
struct LoggingLoader {
    loaded: Option<String>,
}

impl SceneLoader for LoggingLoader {
    fn load(&mut self, scene: &str) {
        log::info!("scene load issued: '{scene}'");
        self.loaded = Some(scene.to_string());
    }
}

/// Built-in demo level used when no config file is given.
fn demo_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.session.target_score = 5;
    config.level.player_spawn = Vec3::new(0.0, 1.0, 0.0);
    config.level.enemy_spawn = Vec3::new(12.0, 1.0, 12.0);
    config.level.waypoints = vec![
        Vec3::new(8.0, 0.0, 8.0),
        Vec3::new(-8.0, 0.0, 8.0),
        Vec3::new(-8.0, 0.0, -8.0),
        Vec3::new(8.0, 0.0, -8.0),
    ];
    config.level.spawn_points = vec![
        Vec3::new(6.0, 0.5, 6.0),
        Vec3::new(-6.0, 0.5, 6.0),
        Vec3::new(-6.0, 0.5, -6.0),
        Vec3::new(6.0, 0.5, -6.0),
        Vec3::new(0.0, 0.5, 0.0),
    ];
    config
}

/// Demo arena: a ground slab, two walls, and a round prop.
fn demo_world() -> ObstacleWorld {
    let mut world = ObstacleWorld::new();
    world.add_ground(Vec3::new(0.0, -0.1, 0.0), 40.0);
    world.add_wall(Vec3::new(0.0, 1.0, 5.0), Vec3::new(3.0, 1.0, 0.3));
    world.add_wall(Vec3::new(-4.0, 1.0, -3.0), Vec3::new(0.3, 1.0, 3.0));
    world.add_prop(Vec3::new(4.0, 0.7, -4.0), 0.7);
    world
}

fn load_config(path: &str) -> Result<GameConfig, ConfigError> {
    if path.ends_with(".json") {
        GameConfig::load_json(path)
    } else {
        GameConfig::load_ron(path)
    }
}

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => {
                log::info!("loaded config from {path}");
                config
            }
            Err(e) => {
                log::error!("failed to load config from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => demo_config(),
    };

    let world = demo_world();
    let mut enemy_body = CharacterBody::new(&world, config.level.enemy_spawn, 0.6, 0.4);
    let mut session = GameSession::new(config.clone());
    let mut loader = LoggingLoader::default();
    let mut rng = rand::thread_rng();

    let mut audio = match AudioPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            log::warn!("audio disabled: {e}");
            None
        }
    };

    session.start(&mut rng);

    let dt = 1.0 / 60.0;
    let player_speed = 3.0;
    let mut player = config.level.player_spawn;
    let max_ticks = (180.0 / dt) as u32;

    for tick in 0..max_ticks {
        // Scripted player: run straight for the current collectible.
        if let Some(collectible) = session.collectible_position() {
            let mut to_collectible = collectible - player;
            to_collectible.y = 0.0;
            if to_collectible.length() > 0.05 {
                player += to_collectible.normalize() * player_speed * dt;
            }
        }
        session.set_player_position(player);

        session.tick(&world, &mut enemy_body, &mut loader, dt, &mut rng);

        if let Some(audio) = audio.as_mut() {
            audio.process(session.events(), &mut rng);
        }
        for event in session.events().iter() {
            match event {
                GameEvent::CollectibleGathered { score } => {
                    log::info!("collected: {score}/{}", config.session.target_score);
                }
                GameEvent::PlayerCaught { position } => {
                    log::info!("caught by the enemy at {position}");
                }
                GameEvent::CourseWon { score } => {
                    log::info!("course won with {score} collectibles");
                }
                GameEvent::EnemyStateChanged { state } => {
                    log::debug!("enemy is now {state}");
                }
                _ => {}
            }
        }

        if loader.loaded.is_some() {
            log::info!("session finished after {:.1}s", tick as f32 * dt);
            break;
        }
    }

    match session.outcome() {
        Some(SessionOutcome::Won) => log::info!("outcome: won ({} collected)", session.score()),
        Some(SessionOutcome::Caught) => {
            log::info!("outcome: caught (score {})", session.score());
        }
        None => log::info!("outcome: time limit reached (score {})", session.score()),
    }
}

//! Headless platformer: a player runs and jumps across a row of platforms,
//! collecting coins, paced at 60 frames per second against the real clock.
//!
//! Run with: `RUST_LOG=info cargo run -p sprocket-engine --example headless_platformer`
//!
//! An optional JSON config path may be passed as the first argument; see
//! `EngineConfig` for the fields.

use std::cell::Cell;
use std::rc::Rc;

use sprocket_engine::prelude::*;
use tracing::info;

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

const GRAVITY: f64 = 0.0015;
const RUN_SPEED: f64 = 0.12;
const JUMP_SPEED: f64 = -0.55;

struct Player {
    state: BodyState,
    tolerances: RectangleTolerances,
    grounded: bool,
}

impl Body for Player {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, delta_ms: i64) {
        let dt = delta_ms as f64;
        self.state.velocity.y += GRAVITY * dt;
        self.state.position = self.state.position + self.state.velocity * dt;
        self.grounded = false;
    }
}

impl RectangleBody for Player {
    fn tolerances(&self) -> RectangleTolerances {
        self.tolerances
    }
}

/// Platforms and coins: static rectangles.
struct Tile {
    state: BodyState,
}

impl Tile {
    fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            state: BodyState::new(Vector2D::new(x, y), w, h),
        }
    }
}

impl Body for Tile {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, _delta_ms: i64) {}
}

impl RectangleBody for Tile {}

type Staged = StagedAdditions<Player, Tile>;

// ---------------------------------------------------------------------------
// Collision rules
// ---------------------------------------------------------------------------

fn land_on_platform(p: &mut Player, tile: &mut Tile, _: &mut Staged) -> anyhow::Result<()> {
    if p.is_on_top_side(&*tile) {
        let up = p.top_colliding_distance(&*tile);
        let pos = p.position();
        p.set_position(Vector2D::new(pos.x, pos.y - up));
        p.set_velocity(Vector2D::new(p.velocity().x, 0.0));
        p.grounded = true;
    } else if p.is_on_bottom_side(&*tile) {
        let down = p.bottom_colliding_distance(&*tile);
        let pos = p.position();
        p.set_position(Vector2D::new(pos.x, pos.y + down));
        p.set_velocity(Vector2D::new(p.velocity().x, 0.0));
    } else if p.is_on_left_side(&*tile) {
        let back = p.left_colliding_distance(&*tile);
        let pos = p.position();
        p.set_position(Vector2D::new(pos.x - back, pos.y));
    } else if p.is_on_right_side(&*tile) {
        let back = p.right_colliding_distance(&*tile);
        let pos = p.position();
        p.set_position(Vector2D::new(pos.x + back, pos.y));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scene setup
// ---------------------------------------------------------------------------

fn main() -> Result<(), anyhow::Error> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig {
            pacing: PacingConfig::SleepIfNeeded { target_fps: 60.0 },
            log_filter: "info".to_owned(),
            ..EngineConfig::default()
        },
    };
    init_tracing(&config.log_filter);

    let mut driver = config.build_driver()?;
    let world = WorldBounds::new(960.0, 320.0);

    let mut players = BodyLayer::iterative_update();
    players.add(Player {
        state: BodyState::new(Vector2D::new(20.0, 200.0), 16.0, 24.0)
            .with_velocity(Vector2D::new(RUN_SPEED, 0.0)),
        tolerances: config.tolerances,
        grounded: false,
    });
    let players = driver.physics_mut().manage_new_layer(players);

    let mut platforms = BodyLayer::no_update();
    platforms.add(Tile::new(0.0, 296.0, 960.0, 24.0));
    for i in 0..6 {
        platforms.add(Tile::new(120.0 + 140.0 * i as f64, 240.0 - 20.0 * (i % 3) as f64, 80.0, 12.0));
    }
    let platforms = driver.physics_mut().manage_new_layer(platforms);

    let mut coins = BodyLayer::no_update();
    for i in 0..12 {
        coins.add(Tile::new(60.0 + 75.0 * i as f64, 210.0, 8.0, 8.0));
    }
    let coins = driver.physics_mut().manage_new_layer(coins);

    driver.physics_mut().register_collision_handler(RectangleCollisionHandler::new(
        "player-vs-platform",
        Rc::clone(&players),
        platforms,
        land_on_platform,
    )?);

    let collected = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&collected);
    driver.physics_mut().register_collision_handler(RectangleCollisionHandler::new(
        "player-vs-coin",
        Rc::clone(&players),
        Rc::clone(&coins),
        move |_: &mut Player, coin: &mut Tile, _: &mut Staged| -> anyhow::Result<()> {
            coin.set_activation(false);
            counter.set(counter.get() + 1);
            Ok(())
        },
    )?);

    // Game logic: jump whenever grounded, wrap around the world edges.
    let jump_players = Rc::clone(&players);
    let mut jump_timer: Option<Alarm> = None;
    driver.add_system("jump", move |_, clock| {
        let timer = jump_timer.get_or_insert_with(|| clock.set_alarm(600 * NANOS_PER_MS));
        let mut players = jump_players.borrow_mut();
        for p in players.iter_mut() {
            if p.grounded && timer.expired(clock) {
                p.set_velocity(Vector2D::new(p.velocity().x, JUMP_SPEED));
                timer.reset(clock);
            }
            if let Some(side) = world.wrap(p, Sides::EAST | Sides::WEST) {
                info!(?side, "player wrapped");
            }
        }
        Ok(())
    });

    driver.start()?;
    let mut total_ms = 0;
    for _ in 0..300 {
        let report = driver.step()?;
        total_ms += report.delta_ms;
    }

    let snapshot = driver.capture_snapshot()?;
    info!(
        frames = snapshot.frame,
        game_ms = total_ms,
        coins = collected.get(),
        hash = %snapshot.hash,
        "run complete"
    );
    println!(
        "{} frames, {} ms of game time, {} coins collected, state {}",
        snapshot.frame,
        total_ms,
        collected.get(),
        &snapshot.hash[..16]
    );
    Ok(())
}

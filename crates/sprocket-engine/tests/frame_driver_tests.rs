//! Integration tests for the frame driver: clock, systems and physics working
//! together on a small platformer scene.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use sprocket_engine::prelude::*;

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Player with gravity.
struct Player {
    state: BodyState,
    tolerances: RectangleTolerances,
    grounded: bool,
}

const GRAVITY: f64 = 0.002;

impl Body for Player {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, delta_ms: i64) {
        let dt = delta_ms as f64;
        if !self.grounded {
            self.state.velocity.y += GRAVITY * dt;
        }
        self.state.position = self.state.position + self.state.velocity * dt;
    }
}

impl RectangleBody for Player {
    fn tolerances(&self) -> RectangleTolerances {
        self.tolerances
    }
}

struct Block {
    state: BodyState,
}

impl Body for Block {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, _delta_ms: i64) {}
}

impl RectangleBody for Block {}

type Driver = FrameDriver<Box<dyn PacingStrategy>>;

struct Scene {
    driver: Driver,
    source: ManualTimeSource,
    players: LayerHandle<Player>,
}

fn scene(config: &EngineConfig) -> Scene {
    let source = ManualTimeSource::new();
    let mut driver = config.build_driver_with_source(source.clone()).unwrap();

    let mut players = BodyLayer::iterative_update();
    players.add(Player {
        state: BodyState::new(Vector2D::new(10.0, 0.0), 8.0, 8.0),
        tolerances: config.tolerances,
        grounded: false,
    });
    let players = driver.physics_mut().manage_new_layer(players);

    let mut floor = BodyLayer::no_update();
    floor.add(Block {
        state: BodyState::new(Vector2D::new(0.0, 40.0), 200.0, 10.0),
    });
    let floor = driver.physics_mut().manage_new_layer(floor);

    let land = |p: &mut Player,
                f: &mut Block,
                _: &mut StagedAdditions<Player, Block>|
     -> anyhow::Result<()> {
        if p.is_on_top_side(&*f) {
            let up = p.top_colliding_distance(&*f);
            let pos = p.position();
            p.set_position(Vector2D::new(pos.x, pos.y - up));
            p.set_velocity(Vector2D::new(p.velocity().x, 0.0));
            p.grounded = true;
        }
        Ok(())
    };
    let handler =
        RectangleCollisionHandler::new("player-vs-floor", Rc::clone(&players), floor, land)
            .unwrap();
    driver.physics_mut().register_collision_handler(handler);

    driver.start().unwrap();
    Scene {
        driver,
        source,
        players,
    }
}

fn run(scene: &mut Scene, frames: usize, frame_nanos: i64) {
    for _ in 0..frames {
        scene.source.advance(frame_nanos);
        scene.driver.step().unwrap();
    }
}

// -- 1. platformer scene --------------------------------------------------

#[test]
fn player_falls_and_lands_on_the_floor() {
    let mut scene = scene(&EngineConfig::default());
    run(&mut scene, 120, 16 * NANOS_PER_MS);

    let players = scene.players.borrow();
    let p = players.get(0).unwrap();
    assert!(p.grounded);
    assert_eq!(p.velocity().y, 0.0);
    let bottom = p.position().y + p.height();
    assert!(bottom <= 40.0 && bottom > 39.0, "bottom = {bottom}");
}

#[test]
fn peg_pacing_bounds_a_long_stall() {
    let config = EngineConfig::from_json_str(
        r#"{ "pacing": { "kind": "peg", "low_nanos": 0, "high_nanos": 20000000 } }"#,
    )
    .unwrap();
    let mut scene = scene(&config);
    scene.source.advance(5 * NANOS_PER_SECOND);
    let report = scene.driver.step().unwrap();
    assert_eq!(report.delta_ms, 20);
}

// -- 2. pausing ------------------------------------------------------------

#[test]
fn paused_frames_freeze_bodies() {
    let mut scene = scene(&EngineConfig::default());
    run(&mut scene, 3, 10 * NANOS_PER_MS);
    let before = scene.players.borrow().get(0).unwrap().position();

    scene.driver.pause().unwrap();
    run(&mut scene, 10, 10 * NANOS_PER_MS);
    let during = scene.players.borrow().get(0).unwrap().position();
    assert_eq!(before, during);

    scene.driver.resume().unwrap();
    run(&mut scene, 1, 10 * NANOS_PER_MS);
    assert_ne!(scene.players.borrow().get(0).unwrap().position(), during);
}

// -- 3. systems and alarms ---------------------------------------------------

#[test]
fn systems_can_use_game_time_alarms() {
    let mut scene = scene(&EngineConfig::default());
    let fired = Rc::new(Cell::new(0u32));
    let mut alarm = scene.driver.clock().set_alarm(50 * NANOS_PER_MS);
    let counter = Rc::clone(&fired);
    scene.driver.add_system("spawn-timer", move |_, clock| {
        if alarm.expired(clock) {
            counter.set(counter.get() + 1);
            alarm.reset(clock);
        }
        Ok(())
    });

    run(&mut scene, 10, 16 * NANOS_PER_MS);
    // 160 ms of game time with a 50 ms timer re-armed at each firing.
    assert_eq!(fired.get(), 2);
}

// -- 4. carry property -------------------------------------------------------

proptest! {
    /// Whole milliseconds handed out plus the carried remainder always equal
    /// the game time elapsed.
    #[test]
    fn no_game_time_is_lost(frames in prop::collection::vec(0i64..5_000_000, 1..60)) {
        let source = ManualTimeSource::new();
        let mut driver = FrameDriver::new(Passthrough::with_source(source.clone()));
        driver.start().unwrap();

        let mut total_ms = 0;
        for nanos in &frames {
            source.advance(*nanos);
            let report = driver.step().unwrap();
            prop_assert!(report.carried_nanos >= 0 && report.carried_nanos < NANOS_PER_MS);
            total_ms += report.delta_ms;
        }
        prop_assert_eq!(
            total_ms * NANOS_PER_MS + driver.carried_nanos(),
            driver.clock().game_time()
        );
        prop_assert_eq!(driver.clock().game_time(), frames.iter().sum::<i64>());
    }
}

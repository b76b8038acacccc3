//! Integration tests for the petal engine.
//!
//! These drive the engine through its public API the way a host would, with
//! a seeded RNG and a recording draw context standing in for the GPU.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sakura::prelude::*;
use sakura::time::ManualClock;
use sakura::{FrameContext, SpriteImage};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Clear,
    Save,
    Restore,
    Alpha(f32),
    Translate(f32, f32),
    Rotate(f32),
    Image(f32, f32, f32, f32),
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn images(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Image(..))).count()
    }
}

impl DrawContext for Recorder {
    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }
    fn save(&mut self) {
        self.calls.push(Call::Save);
    }
    fn restore(&mut self) {
        self.calls.push(Call::Restore);
    }
    fn set_global_alpha(&mut self, alpha: f32) {
        self.calls.push(Call::Alpha(alpha));
    }
    fn translate(&mut self, x: f32, y: f32) {
        self.calls.push(Call::Translate(x, y));
    }
    fn rotate(&mut self, angle: f32) {
        self.calls.push(Call::Rotate(angle));
    }
    fn draw_image(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.calls.push(Call::Image(x, y, width, height));
    }
}

fn running_engine(count: usize, width: u32, height: u32) -> Engine {
    let config = SakuraConfig::default().with_petal_count(count).with_seed(42);
    let mut engine = Engine::new(config).unwrap();
    engine.init(width, height);
    engine.sprite_ready();
    engine
}

/// A petal that drifts at a constant velocity while wind and pointer are zero.
fn pin(petal: &mut Petal, x: f32, y: f32) {
    petal.x = x;
    petal.y = y;
    petal.x_speed = -1.0;
    petal.y_speed = 1.0;
    petal.wind_force = 0.0;
    petal.speed_variation = 1.0;
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_speed_clamp_holds_for_any_number_of_frames() {
    let mut engine = running_engine(30, 800, 600);
    let mut batch = SpriteBatch::new();

    // Sweep wall-clock time across several wind periods, with the pointer moving too
    let mut now = 1.7e12;
    for frame in 0..3000 {
        let x = (frame % 800) as f64;
        engine.touch_handler(&PointerEvent::Move { client_x: x });
        engine.render(&mut batch, now);
        now += 41.0;

        for petal in engine.petals() {
            assert!((-3.0..=-0.5).contains(&petal.x_speed), "x_speed {}", petal.x_speed);
            assert!((0.3..=1.8).contains(&petal.y_speed), "y_speed {}", petal.y_speed);
        }
    }
}

#[test]
fn test_reset_postconditions() {
    let config = SakuraConfig::default();
    let mut rng = StdRng::seed_from_u64(9);
    let mut petal = Petal::new(&mut rng, &config, 800.0);

    for _ in 0..200 {
        petal.reset(&mut rng, &config, 800.0);
        assert_eq!(petal.y, -petal.height);
        assert!(petal.x >= 0.0 && petal.x < 800.0);
        assert_eq!(petal.opacity, petal.width / 50.0);
    }
}

#[test]
fn test_steady_drift_left_and_down_until_recycled() {
    let config = SakuraConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut petal = Petal::new(&mut rng, &config, 800.0);
    pin(&mut petal, 400.0, 0.0);

    let frame = FrameContext {
        config: &config,
        width: 800.0,
        height: 600.0,
        wind_direction: 0.0,
        pointer_bias: 0.0,
    };
    let mut ctx = Recorder::default();

    let mut frames = 0;
    loop {
        let (x, y) = (petal.x, petal.y);
        let recycled = petal.animate(&frame, &mut rng, &mut ctx);
        frames += 1;
        if recycled {
            break;
        }
        assert!(petal.x < x, "x did not decrease on frame {}", frames);
        assert!(petal.y > y, "y did not increase on frame {}", frames);
        assert!(frames < 10_000, "petal never left the surface");
    }

    // One unit down per frame from y = 0 leaves the bottom after 601 frames,
    // and is recycled on the frame after that
    assert_eq!(frames, 602);
    assert_eq!(ctx.images(), 602);
}

#[test]
fn test_out_of_bounds_petal_is_back_in_bounds_after_one_call() {
    let config = SakuraConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let frame = FrameContext {
        config: &config,
        width: 800.0,
        height: 600.0,
        wind_direction: 0.0,
        pointer_bias: 0.0,
    };

    for (x, y) in [(801.0, 10.0), (10.0, 601.0), (5000.0, 5000.0)] {
        let mut petal = Petal::new(&mut rng, &config, 800.0);
        petal.x = x;
        petal.y = y;

        let mut ctx = Recorder::default();
        assert!(petal.animate(&frame, &mut rng, &mut ctx));
        assert!(petal.x < 800.0 && petal.y < 600.0);
        assert!(petal.y < 0.0, "recycled petal should sit just above the top edge");
        assert_eq!(ctx.images(), 1);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_end_to_end_single_petal() {
    let mut engine = running_engine(1, 800, 600);
    pin(&mut engine.petals_mut()[0], 801.0, 590.0);

    // Wind is exactly zero at t = 0
    let mut ctx = Recorder::default();
    let outcome = engine.render(&mut ctx, 0.0);
    assert_eq!(outcome, FrameOutcome::Drawn { petals: 1, recycled: 1 });
    assert_eq!(engine.wind_direction(), 0.0);

    // Clear first, then one balanced draw of the freshly reset petal
    assert_eq!(ctx.calls[0], Call::Clear);
    assert_eq!(ctx.calls[1], Call::Save);
    assert_eq!(*ctx.calls.last().unwrap(), Call::Restore);
    assert_eq!(ctx.images(), 1);

    let petal = engine.petals()[0].clone();
    assert!(petal.y < 0.0);
    match ctx.calls[3] {
        Call::Translate(x, y) => assert_eq!((x, y), (petal.x, petal.y)),
        ref other => panic!("expected translate, got {:?}", other),
    }
    if let Call::Image(x, y, w, h) = ctx.calls[5] {
        assert_eq!((x, y, w, h), (-petal.width / 2.0, -petal.height / 2.0, petal.width, petal.height));
    }

    // Following frames keep moving left and down
    let mut prev = petal;
    for _ in 0..5 {
        let mut ctx = Recorder::default();
        engine.render(&mut ctx, 0.0);
        let now = &engine.petals()[0];
        assert!(now.x < prev.x);
        assert!(now.y > prev.y);
        prev = now.clone();
    }
}

#[test]
fn test_resize_does_not_move_petals() {
    let mut engine = running_engine(1, 800, 600);
    pin(&mut engine.petals_mut()[0], 700.0, 300.0);

    engine.resize_canvas(400, 300);
    assert_eq!(engine.petals()[0].x, 700.0);
    assert_eq!(engine.petals()[0].y, 300.0);

    // Recycled on the next animate, into the new bounds
    let mut ctx = Recorder::default();
    let outcome = engine.render(&mut ctx, 0.0);
    assert_eq!(outcome, FrameOutcome::Drawn { petals: 1, recycled: 1 });
    assert!(engine.petals()[0].x < 400.0);
}

#[test]
fn test_pointer_on_right_pushes_petals_right_and_down() {
    let mut still = running_engine(1, 800, 600);
    let mut pushed = running_engine(1, 800, 600);
    pin(&mut still.petals_mut()[0], 400.0, 100.0);
    pin(&mut pushed.petals_mut()[0], 400.0, 100.0);

    pushed.touch_handler(&PointerEvent::Touch { touches: vec![800.0] });
    assert_eq!(pushed.pointer_bias(), 1.0);

    let mut ctx = Recorder::default();
    still.render(&mut ctx, 0.0);
    pushed.render(&mut ctx, 0.0);

    let (a, b) = (&still.petals()[0], &pushed.petals()[0]);
    assert!((b.x - a.x - 3.0).abs() < 1e-4);
    assert!((b.y - a.y - 1.0).abs() < 1e-4);
}

#[test]
fn test_same_seed_same_animation() {
    let mut a = running_engine(30, 800, 600);
    let mut b = running_engine(30, 800, 600);
    let mut batch_a = SpriteBatch::new();
    let mut batch_b = SpriteBatch::new();

    for frame in 0..500 {
        let now = 1.7e12 + frame as f64 * 16.0;
        a.render(&mut batch_a, now);
        b.render(&mut batch_b, now);
    }
    assert_eq!(a.petals(), b.petals());
    assert_eq!(batch_a.instances(), batch_b.instances());
}

#[test]
fn test_wind_follows_injected_clock() {
    let mut engine = running_engine(5, 800, 600);
    let mut batch = SpriteBatch::new();
    let clock = ManualClock::new(0.0);

    engine.render(&mut batch, clock.now_ms());
    assert_eq!(engine.wind_direction(), 0.0);

    // A quarter period later the wind peaks
    clock.advance(std::f64::consts::FRAC_PI_2 / 0.0005);
    engine.render(&mut batch, clock.now_ms());
    assert!((engine.wind_direction() - 0.02).abs() < 1e-6);

    // Half a period later it has turned around
    clock.advance(std::f64::consts::PI / 0.0005);
    engine.render(&mut batch, clock.now_ms());
    assert!((engine.wind_direction() + 0.02).abs() < 1e-6);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_full_lifecycle() {
    let config = SakuraConfig::default().with_seed(1);
    let mut engine = Engine::new(config).unwrap();
    assert_eq!(engine.state(), &EngineState::Uninitialized);

    engine.init(1024, 768);
    assert_eq!(engine.state(), &EngineState::Loading);

    let mut ctx = Recorder::default();
    assert_eq!(engine.render(&mut ctx, 0.0), FrameOutcome::Idle);
    assert!(ctx.calls.is_empty());

    engine.sprite_ready();
    assert_eq!(engine.petals().len(), 30);

    let mut batch = SpriteBatch::new();
    for _ in 0..10 {
        assert!(matches!(engine.render(&mut batch, 0.0), FrameOutcome::Drawn { .. }));
        assert_eq!(batch.len(), 30);
        assert_eq!(batch.depth(), 0);
    }

    engine.stop();
    assert!(!engine.is_scheduled());
    assert_eq!(engine.render(&mut batch, 0.0), FrameOutcome::Idle);
}

#[test]
fn test_engine_refuses_configs_that_cannot_animate() {
    for text in [
        "(width: (start: 15.0, end: inf))",
        "(rotation: (start: -3.0e38, end: 3.0e38))",
        "(pointer_push: (x: NaN))",
        "(window: (height: 0))",
    ] {
        assert!(SakuraConfig::from_ron_str(text).is_err(), "accepted {}", text);
    }

    let mut config = SakuraConfig::default().with_seed(3);
    config.pointer_push.x = f32::NAN;
    assert!(Engine::new(config).is_err());
}

#[test]
fn test_bundled_sprite_decodes() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/sakura.png");
    let sprite = SpriteImage::from_file(path).unwrap();
    assert_eq!((sprite.width, sprite.height), (64, 64));
    // Transparent corner, opaque middle
    assert_eq!(sprite.data[3], 0);
    let mid = ((32 * 64 + 32) * 4 + 3) as usize;
    assert!(sprite.data[mid] > 200);
}

//! Fragile Gate entry point
//!
//! The browser build is driven from JavaScript through `WebGame`. The
//! native binary plays a headless autopilot session and logs the result.
//!
//! Usage: `fragile-gate [seed] [player]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fragile_gate::consts::TICK_MS;
    use fragile_gate::sim::{
        EventSink, GamePhase, GameState, PowerUpKind, ShapeKind, TickInput, tick,
    };
    use fragile_gate::{Leaderboard, PlayerProfile, Settings};

    /// Ten simulated minutes
    const MAX_TICKS: u64 = 10 * 60 * 1000 / TICK_MS;

    #[derive(Default)]
    struct Tally {
        collected: u32,
        misses: u32,
        power_ups: u32,
        transitions: u32,
    }

    impl EventSink for Tally {
        fn on_success(
            &mut self,
            _x: f32,
            _y: f32,
            _kind: ShapeKind,
            _golden: bool,
            _power_up: bool,
        ) {
            self.collected += 1;
        }

        fn on_miss(&mut self, _x: f32, _y: f32, _color: u32) {
            self.misses += 1;
        }

        fn on_power_up_activated(&mut self, _kind: PowerUpKind, _duration_ms: u64) {
            self.power_ups += 1;
        }

        fn on_frame_transition_start(&mut self) {
            self.transitions += 1;
        }
    }

    env_logger::init();
    log::info!("Fragile Gate (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    let player = args.next().unwrap_or_else(|| String::from("autopilot"));

    let settings = Settings::load();
    let mut profile = PlayerProfile::load(&player);
    let mut leaderboard = Leaderboard::load();

    let mut state = GameState::new(seed, 800.0, 600.0);
    state.apply_settings(&settings);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut tally = Tally::default();
    while state.phase == GamePhase::Playing && state.time_ticks < MAX_TICKS {
        tick(&mut state, &input, &mut profile, TICK_MS);
        for event in state.drain_events() {
            event.dispatch(&mut tally);
        }
    }

    let rank = leaderboard.record(&player, state.score, 0.0);
    leaderboard.save();

    println!("seed:        {seed}");
    println!("score:       {}", state.score);
    println!("survived:    {:.1}s", state.clock_ms as f64 / 1000.0);
    println!("collected:   {}", tally.collected);
    println!("misses:      {}", tally.misses);
    println!("power-ups:   {}", tally.power_ups);
    println!("transitions: {}", tally.transitions);
    println!("tokens:      {}", profile.tokens);
    match rank {
        Some(rank) => println!("rank:        #{rank}"),
        None => println!("rank:        -"),
    }
    if let Some(best) = leaderboard.top_score() {
        println!("board best:  {best}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

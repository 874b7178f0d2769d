//! Splashsort entry point
//!
//! Native builds have no renderer; this runs a headless round driven by a
//! simple bot so the engine can be watched through the log.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use splashsort::sim::{GameEngine, GameEvent, GamePhase, Placement};
use splashsort::{FileHighScore, HighScoreStore, Settings, Tuning};

/// Simulation step for the demo loop
const FRAME: Duration = Duration::from_millis(100);
/// The bot plays until this level, then lets the clock run out
const BOT_LAST_LEVEL: u32 = 5;
/// Pause between the bot's drops
const BOT_REACTION_MS: u64 = 700;
/// Give up after this much simulated time
const MAX_SIM_MS: u64 = 10 * 60 * 1000;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Splashsort (native) starting...");

    let dir = std::env::temp_dir();
    let store = match FileHighScore::open(dir.join("splashsort_highscore.json")) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open high score: {}", e);
            std::process::exit(1);
        }
    };
    let settings = Settings::load(&dir.join("splashsort_settings.json"));

    let tuning = Tuning {
        color_attempt_cap: Some(10_000),
        ..Default::default()
    };
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Game initialized with seed: {}", seed);

    let mut engine = match GameEngine::with_tuning(tuning, store, seed) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Bad tuning: {}", e);
            std::process::exit(1);
        }
    };

    engine.start_round();
    let mut next_move_ms = BOT_REACTION_MS;

    while engine.phase() != GamePhase::GameOver && engine.clock_ms() < MAX_SIM_MS {
        if engine.phase() == GamePhase::Playing
            && engine.state().level <= BOT_LAST_LEVEL
            && engine.clock_ms() >= next_move_ms
        {
            bot_move(&mut engine);
            next_move_ms = engine.clock_ms() + BOT_REACTION_MS;
        }
        engine.update(FRAME);
        report(&settings, &engine.drain_events());
    }

    let snapshot = engine.snapshot();
    log::info!(
        "Final: level {}, {} points, high score {}",
        snapshot.level,
        snapshot.points,
        engine.store().get()
    );
}

/// Drag the first token onto the target of the same colour
fn bot_move<S: HighScoreStore>(engine: &mut GameEngine<S>) {
    let Some(token) = engine.state().tokens.first().cloned() else {
        return;
    };
    let Some(target) = engine
        .state()
        .targets
        .iter()
        .find(|t| t.color == token.color)
        .map(|t| t.pos)
    else {
        return;
    };

    engine.move_token(token.id, token.pos.lerp(target, 0.5));
    match engine.attempt_placement(token.id, target) {
        Placement::Matched { level_complete, .. } => {
            log::debug!("Bot matched token {} (level done: {})", token.id, level_complete);
        }
        other => log::debug!("Bot drop of token {} gave {:?}", token.id, other),
    }
}

/// Stand-in for audio/haptics/HUD
fn report(settings: &Settings, events: &[GameEvent]) {
    for event in events.iter().filter(|e| settings.wants(e)) {
        match event {
            GameEvent::Cue { cue, .. } => {
                log::info!(
                    "♪ {} (volume {:.2})",
                    cue.name(),
                    settings.effective_volume(*cue)
                );
            }
            GameEvent::Haptic => log::debug!("bzz"),
            GameEvent::LevelStarted { level, time_secs } => {
                log::info!("Level {} - {}s on the clock", level, time_secs);
            }
            GameEvent::NewHighScore(level) => log::debug!("HUD: best level {}", level),
            GameEvent::Matched { .. } | GameEvent::PhaseChanged(_) => {}
        }
    }
}

//! Headless brick game runner (default binary).
//!
//! Plays a scripted session against the engine and prints the final snapshot
//! as JSON. Rendering and live input belong to a front end; this binary is
//! for smoke runs and for recording reproducible sessions.
//!
//! Usage: `brickgame [GAME] [TICKS] [ACTION...]`
//!
//! - `GAME`: `tetris` (default) or `snake`
//! - `TICKS`: idle ticks after the script (default 20)
//! - `ACTION`: one of start, pause, terminate, left, right, up, down, action;
//!   a trailing `!` sends it as held. Each scripted action is followed by a tick.
//!
//! Set `BRICKGAME_SEED` for a reproducible run (see `GameConfig::from_env`).

mod logging;

use anyhow::{anyhow, Context, Result};

use brickgame::core::GameConfig;
use brickgame::engine::Engine;
use brickgame::types::{GameId, UserAction};

const DEFAULT_TICKS: u32 = 20;

/// One scripted step
fn parse_step(token: &str) -> Result<(UserAction, bool)> {
    let (name, hold) = match token.strip_suffix('!') {
        Some(name) => (name, true),
        None => (token, false),
    };
    let action = UserAction::from_str(name).ok_or_else(|| anyhow!("unknown action {token:?}"))?;
    Ok((action, hold))
}

fn main() -> Result<()> {
    logging::setup(logging::debug_from_env())?;

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "tetris".to_string());
    let id = GameId::from_name(&name).ok_or_else(|| anyhow!("unknown game {name:?}"))?;
    let ticks = match args.next() {
        Some(t) => t.parse::<u32>().with_context(|| format!("bad tick count {t:?}"))?,
        None => DEFAULT_TICKS,
    };
    let script = args
        .map(|token| parse_step(&token))
        .collect::<Result<Vec<_>>>()?;

    let config = GameConfig::from_env();
    log::info!("score dir: {:?}, seed: {:?}", config.score_dir, config.seed);

    let mut engine = Engine::with_builtin_games(&config);
    engine.switch_to(id)?;
    engine.input(UserAction::Start, false);

    for (action, hold) in script {
        engine.input(action, hold);
        engine.update();
    }
    for _ in 0..ticks {
        engine.update();
    }

    let info = engine
        .info()
        .ok_or_else(|| anyhow!("no active game"))?;
    println!("{}", serde_json::to_string_pretty(info)?);

    engine.close();
    Ok(())
}

//! Headless demo driver
//!
//! Usage: `wrist-arcade [dino|spaceship|<config.json>]`
//!
//! Runs a session against a fake canvas and logs what a renderer would see.
//! Set `RUST_LOG=debug` to see every game event.

use std::process::ExitCode;
use std::time::Duration;

use wrist_arcade::assets::runner_draw_list;
use wrist_arcade::sim::RunnerPhase;
use wrist_arcade::{ConfigResult, GameConfig, Session, Variant};

/// Runner demo length (20 seconds at 24 Hz)
const DEMO_TICKS: u64 = 480;
/// Jump when an obstacle's left edge is this close to the dino
const JUMP_LEAD: f32 = 45.0;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1).unwrap_or_else(|| "dino".to_string());
    let config = match load_config(&arg) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Wrist Arcade ({}) starting at {} Hz...",
        config.variant.as_str(),
        config.tick_rate_hz()
    );
    let variant = config.variant;
    let session = Session::spawn(config);
    match variant {
        Variant::Dino => run_dino(&session).await,
        Variant::Spaceship => run_spaceship(&session).await,
    }
    session.shutdown().await;
    ExitCode::SUCCESS
}

fn load_config(arg: &str) -> ConfigResult<GameConfig> {
    if arg.ends_with(".json") {
        GameConfig::load(arg)
    } else {
        GameConfig::for_variant_name(arg)
    }
}

/// Autopilot: jump over whatever comes close, until crash or time's up
async fn run_dino(session: &Session) {
    let mut rx = session.subscribe();
    session.resize(400.0, 300.0, false);
    session.start();

    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        let Some(dino) = snapshot.dino() else {
            break;
        };

        if !snapshot.is_playing {
            log::info!(
                "Game over at tick {}: score {} (best {})",
                snapshot.ticks,
                snapshot.score,
                snapshot.best_score
            );
            break;
        }
        if snapshot.ticks >= DEMO_TICKS {
            log::info!("Survived {} ticks", snapshot.ticks);
            break;
        }

        let dino_right = dino.pos.x + dino.size.x;
        let threatened = snapshot.obstacles.iter().any(|o| {
            let gap = o.pos.x - dino_right;
            (0.0..=JUMP_LEAD).contains(&gap)
        });
        if threatened && dino.phase == RunnerPhase::Running {
            session.jump();
        }

        if snapshot.ticks > 0 && snapshot.ticks % 24 == 0 {
            log::info!(
                "tick {:>4}  dino {:?} at y={:.0}  sprites={}",
                snapshot.ticks,
                dino.phase,
                dino.pos.y,
                runner_draw_list(&snapshot).len()
            );
        }
    }
}

/// Scripted flight: thrust, turn, fire, coast
async fn run_spaceship(session: &Session) {
    session.resize(300.0, 300.0, true);

    session.press_down();
    tokio::time::sleep(Duration::from_secs(1)).await;
    session.rotate(135.0);
    session.fire();
    session.fire();
    tokio::time::sleep(Duration::from_millis(500)).await;

    session.press_down();
    tokio::time::sleep(Duration::from_millis(500)).await;
    session.press_up();
    tokio::time::sleep(Duration::from_secs(2)).await;

    let snapshot = session.latest_snapshot();
    if let Some(ship) = snapshot.ship() {
        log::info!(
            "tick {}: ship at ({:.1}, {:.1}) heading {}°, thrust ({:.2}, {:.2}), {} shots in flight",
            snapshot.ticks,
            ship.pos.x,
            ship.pos.y,
            ship.rotation_degrees,
            ship.thrust.x,
            ship.thrust.y,
            snapshot.shots.len()
        );
    }
}

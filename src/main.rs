//! Ball Panels entry point
//!
//! Native: a headless run that restores the board, lets it settle, throws a
//! ball across panels and saves. Usage: `ball-panels [settings.json]`.
//! Web: sets up logging and restores a LocalStorage-backed board.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use ball_panels::consts::GRADIENT_SHADE;
    use ball_panels::persistence::StorageBackend;
    use ball_panels::sim::{Board, Gesture, Rect};
    use ball_panels::{Result, Settings};
    use glam::DVec2;

    /// Frames allowed for the board to settle between steps
    const SETTLE_FRAMES: usize = 100_000;
    /// Layout of the two side-by-side containers
    const PANEL_SIZE: (f64, f64) = (640.0, 480.0);
    const PANEL_GAP: f64 = 20.0;

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }

    pub fn run() -> Result<()> {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let seed = settings.seed.unwrap_or_else(clock_seed);
        let storage = StorageBackend::open(settings.storage_kind()?, settings.storage_path.clone())?;
        let mut board = Board::new(&settings, storage, seed)?;

        for index in 0..board.panels().len() {
            let left = index as f64 * (PANEL_SIZE.0 + PANEL_GAP);
            board.resize(index, Rect::new(left, 0.0, PANEL_SIZE.0, PANEL_SIZE.1))?;
        }
        board.restore()?;

        let frames = board.run_until_quiescent(SETTLE_FRAMES);
        log::info!("Settled {} balls in {} frames", board.ball_count(), frames);

        // Fling the first ball of the first panel into the last one
        let target = board.panels().len() - 1;
        let first = board.panels().iter().find_map(|p| p.balls().first().map(|b| b.id));
        if let Some(id) = first {
            let target_rect = board.panel(target)?.rect();
            let start = DVec2::new(target_rect.left - 100.0, 200.0);
            let end = DVec2::new(target_rect.left + 120.0, 240.0);
            board.handle(Gesture::Start { ball: id, pointer: start, time: 0.0 })?;
            board.handle(Gesture::Drop { ball: id, target, pointer: end, time: 180.0 })?;

            let frames = board.run_until_quiescent(SETTLE_FRAMES);
            log::info!("Throw settled in {frames} frames");
        }

        for panel in board.panels() {
            println!(
                "panel {} (friction {}): {} balls",
                panel.index(),
                panel.friction(),
                panel.balls().len()
            );
            for ball in panel.balls() {
                println!(
                    "  {} {}..{} at ({:.1}, {:.1})",
                    ball.id,
                    ball.color.to_hex(),
                    ball.color.shade(GRADIENT_SHADE).to_hex(),
                    ball.pos.x,
                    ball.pos.y
                );
            }
        }

        board.save()?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use ball_panels::persistence::{LocalStorage, StorageBackend};
    use ball_panels::sim::{Board, Rect};
    use ball_panels::{Result, Settings};

    pub fn run() -> Result<()> {
        let settings = Settings::default();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let storage = StorageBackend::Local(LocalStorage::open()?);
        let mut board = Board::new(&settings, storage, seed)?;
        // Page layout owns the real geometry; start from a sane default
        for index in 0..board.panels().len() {
            board.resize(index, Rect::new(index as f64 * 660.0, 0.0, 640.0, 480.0))?;
        }
        board.restore()?;
        log::info!(
            "Ball Panels running with {} balls (autosave {})",
            board.ball_count(),
            board.autosave_enabled()
        );
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Ball Panels starting...");
    if let Err(e) = web::run() {
        log::error!("Startup failed: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Panels (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

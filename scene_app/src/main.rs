//! Headless scene viewer
//!
//! Bootstraps the shipped scene from the asset tree, then drives the frame
//! loop for a fixed number of frames. Usage:
//!
//! ```text
//! scene_viewer [CONFIG] [FRAMES]
//! ```

use scene_engine::foundation::{logging, time::Timer};
use scene_engine::prelude::*;

const DEFAULT_CONFIG: &str = "scene.toml";
const DEFAULT_FRAMES: u64 = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let frames = match args.next() {
        Some(value) => value.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };

    let config = GameConfig::load_or_default(&config_path)?;
    let (width, height) = (config.window.width, config.window.height);
    log::info!("Starting scene viewer ({}x{}, {} frames)", width, height, frames);

    let mut game = Game::new(config);
    game.init(width, height, &FileAssetParser::new())?;

    let mut timer = Timer::new();
    for frame in 0..frames {
        let dt = timer.tick();

        // Fly forward for the first half, then hand over to the player rig
        if frame == 0 {
            game.control_mut().press(MoveKeys::FORWARD);
        } else if frame == frames / 2 {
            game.control_mut().release(MoveKeys::FORWARD);
            game.create_player()?;
            game.update_viewports(width * 2, height * 2);
        }

        if game.update(dt)? == FrameOutcome::NoCamera {
            break;
        }
    }

    log::info!(
        "Ran {} frames in {:.2}s ({:.1} fps average)",
        game.frame_count(),
        timer.total_time(),
        timer.average_fps()
    );
    Ok(())
}

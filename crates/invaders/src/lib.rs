use std::path::Path;

use anyhow::Result;
use invaders_common::app::App;
use invaders_core::leaderboard::FileStore;
use invaders_core::InvadersApp;
use invaders_sdl2::{SdlContext, SdlInitInfo};

/// Leaderboard file used when none is given on the command line.
pub const DEFAULT_LEADERBOARD: &str = "leaderboard.bin";

pub fn run(leaderboard: &Path) -> Result<()> {
    log::info!("Leaderboard file: '{}'", leaderboard.display());
    let app = InvadersApp::new(FileStore::new(leaderboard));
    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, app)?;
    Ok(())
}

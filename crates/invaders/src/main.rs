use std::path::PathBuf;

fn main() {
    env_logger::init();

    let leaderboard = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(invaders::DEFAULT_LEADERBOARD));

    if let Err(e) = invaders::run(&leaderboard) {
        eprintln!("invaders: {e:#}");
        std::process::exit(1);
    }
}

use anyhow::{Context, Result};
use invaders_common::app::App;
use invaders_common::key::Key;
use log::{error, info, warn};

use crate::audio::{AudioSink, Silent};
use crate::input::Event;
use crate::leaderboard::{self, Entry, ScoreStore};
use crate::render::FrameBuffer;
use crate::scene::{CreditScene, GameScene, GameSceneInit, LeaderboardScene, Scene, TitleScene};
use crate::sound::SoundManager;
use crate::{FRAME_RATE_HZ, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    /// The scene is valid and being ticked.
    Running,
    /// The scene finished; its teardown runs before the next one starts.
    Ending,
}

/// The scene on screen.
pub enum ActiveScene {
    Credits(CreditScene),
    Title(TitleScene),
    Game(GameScene),
    Leaderboard(LeaderboardScene),
}

impl ActiveScene {
    pub fn as_scene(&self) -> &dyn Scene {
        match self {
            ActiveScene::Credits(scene) => scene,
            ActiveScene::Title(scene) => scene,
            ActiveScene::Game(scene) => scene,
            ActiveScene::Leaderboard(scene) => scene,
        }
    }

    pub fn as_scene_mut(&mut self) -> &mut dyn Scene {
        match self {
            ActiveScene::Credits(scene) => scene,
            ActiveScene::Title(scene) => scene,
            ActiveScene::Game(scene) => scene,
            ActiveScene::Leaderboard(scene) => scene,
        }
    }
}

/// Frontend-facing wrapper that cycles through the scenes forever.
///
/// The credits card runs once at start-up. After that it is title, game and
/// leaderboard, round and round: the game's score goes to the leaderboard
/// scene and a board it changed is saved. Quitting from any scene ends the
/// whole app.
pub struct InvadersApp<S: ScoreStore> {
    store: S,
    board: Vec<Entry>,
    scene: Option<ActiveScene>,
    stage: Stage,
    /// Coins carried from one scene to the next.
    credits: u32,
    should_exit: bool,
    muted: bool,
    sound: Option<SoundManager>,
}

impl<S: ScoreStore> InvadersApp<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            board: leaderboard::placeholder(),
            scene: None,
            stage: Stage::Running,
            credits: 0,
            should_exit: false,
            muted: false,
            sound: None,
        }
    }

    /// Run without opening an audio device.
    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }

    pub fn scene(&self) -> Option<&ActiveScene> {
        self.scene.as_ref()
    }

    pub fn board(&self) -> &[Entry] {
        &self.board
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    fn begin(&mut self, mut scene: ActiveScene) {
        scene.as_scene_mut().start();
        self.scene = Some(scene);
        self.stage = Stage::Running;
    }

    fn game_scene(&self) -> GameScene {
        let audio: Box<dyn AudioSink> = match &self.sound {
            Some(sound) => Box::new(sound.clone()),
            None => Box::new(Silent),
        };
        GameScene::new(
            GameSceneInit::builder()
                .hi_score(leaderboard::best_score(&self.board))
                .credits(self.credits)
                .audio(audio)
                .build(),
        )
    }

    fn title_scene(&self) -> TitleScene {
        TitleScene::new(leaderboard::best_score(&self.board), self.credits)
    }

    /// Hand whatever `finished` produced to the scene that follows it.
    fn next_scene(&mut self, finished: ActiveScene) -> ActiveScene {
        match finished {
            ActiveScene::Credits(_) => ActiveScene::Title(self.title_scene()),
            ActiveScene::Title(title) => {
                self.credits = title.credits();
                ActiveScene::Game(self.game_scene())
            }
            ActiveScene::Game(game) => {
                info!("Game finished with {}", game.p1_score());
                self.credits = game.credits();
                let mut board = LeaderboardScene::new(self.board.clone());
                board.set_p1_score(game.p1_score());
                board.set_hi_score(game.hi_score());
                ActiveScene::Leaderboard(board)
            }
            ActiveScene::Leaderboard(board) => {
                if board.recorded() {
                    self.board = board.board().to_vec();
                    if let Err(e) = self.store.save(&self.board) {
                        error!("Failed to save leaderboard: {e}");
                    }
                }
                ActiveScene::Title(self.title_scene())
            }
        }
    }
}

impl<S: ScoreStore> App for InvadersApp<S> {
    fn init(&mut self) -> Result<()> {
        info!("Invaders init");
        if !self.muted {
            self.sound = Some(SoundManager::new().context("audio start-up failed")?);
        }
        self.board = match self.store.load() {
            Ok(board) => board,
            Err(e) => {
                warn!("Failed to load leaderboard, starting from scratch: {e}");
                leaderboard::placeholder()
            }
        };
        self.begin(ActiveScene::Credits(CreditScene::new()));
        Ok(())
    }

    fn update(&mut self, screen: &mut [u8]) {
        let Some(active) = self.scene.as_mut() else {
            return;
        };
        let scene = active.as_scene_mut();

        let mut finished = false;
        match self.stage {
            Stage::Running => {
                scene.update();
                if !scene.is_valid() {
                    self.stage = Stage::Ending;
                }
            }
            Stage::Ending => {
                if scene.is_exiting() {
                    self.should_exit = true;
                } else {
                    finished = scene.end();
                }
            }
        }

        let mut frame = FrameBuffer::new(screen, SCREEN_WIDTH, SCREEN_HEIGHT);
        scene.draw(&mut frame);
        scene.render_overlay(&mut frame);

        if finished {
            if let Some(done) = self.scene.take() {
                let next = self.next_scene(done);
                self.begin(next);
            }
        }
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        match (self.stage, self.scene.as_mut()) {
            (Stage::Running, Some(active)) => active.as_scene_mut().process_event(Event::Key {
                key,
                pressed: is_down,
            }),
            // Mid-teardown only quitting does anything.
            _ if key == Key::Escape && is_down => self.should_exit = true,
            _ => {}
        }
    }

    fn handle_quit(&mut self) {
        match (self.stage, self.scene.as_mut()) {
            (Stage::Running, Some(active)) => active.as_scene_mut().process_event(Event::Quit),
            _ => self.should_exit = true,
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        info!("Invaders exit");
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn title(&self) -> String {
        "1978 Space Invaders".to_string()
    }

    fn frame_rate(&self) -> u32 {
        self.scene
            .as_ref()
            .map_or(FRAME_RATE_HZ, |active| active.as_scene().frame_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{LeaderboardError, PLACEHOLDER_NAME};
    use crate::scene::Ranking;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStore(Rc<RefCell<Option<Vec<Entry>>>>);

    impl ScoreStore for MemoryStore {
        fn load(&self) -> Result<Vec<Entry>, LeaderboardError> {
            Ok(self
                .0
                .borrow()
                .clone()
                .unwrap_or_else(leaderboard::placeholder))
        }

        fn save(&self, entries: &[Entry]) -> Result<(), LeaderboardError> {
            *self.0.borrow_mut() = Some(entries.to_vec());
            Ok(())
        }
    }

    type TestApp = InvadersApp<MemoryStore>;

    fn screen() -> Vec<u8> {
        vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 3]
    }

    fn started(store: &MemoryStore) -> TestApp {
        let mut app = InvadersApp::new(store.clone()).muted();
        app.init().unwrap();
        app
    }

    fn press(app: &mut TestApp, key: Key) {
        app.handle_key_event(key, true);
        app.handle_key_event(key, false);
    }

    fn run_until(app: &mut TestApp, screen: &mut [u8], done: impl Fn(&ActiveScene) -> bool) {
        let mut frames = 0;
        while !app.scene().is_some_and(&done) {
            app.update(screen);
            frames += 1;
            assert!(frames < 5000, "scene never changed");
        }
    }

    fn on_title(scene: &ActiveScene) -> bool {
        matches!(scene, ActiveScene::Title(_))
    }

    fn in_game(scene: &ActiveScene) -> bool {
        matches!(scene, ActiveScene::Game(_))
    }

    fn on_board(scene: &ActiveScene) -> bool {
        matches!(scene, ActiveScene::Leaderboard(_))
    }

    /// End the running game with `score` on the board.
    fn lose_with(app: &mut TestApp, score: u32) {
        if let Some(ActiveScene::Game(game)) = app.scene.as_mut() {
            game.set_p1_score(score);
            game.player_mut().lives = 1;
            game.player_mut().explode();
        }
    }

    #[test]
    fn credits_run_first_then_the_title() {
        let store = MemoryStore::default();
        let mut app = started(&store);
        assert!(matches!(app.scene(), Some(ActiveScene::Credits(_))));
        let mut screen = screen();
        run_until(&mut app, &mut screen, on_title);
        assert!(!app.should_exit());
    }

    #[test]
    fn best_saved_score_becomes_the_hi_score() {
        let store = MemoryStore::default();
        store
            .save(&[Entry::new("XYZ", 500).unwrap(), Entry::new("ABC", 90).unwrap()])
            .unwrap();
        let mut app = started(&store);
        let mut screen = screen();
        press(&mut app, Key::Return);
        run_until(&mut app, &mut screen, on_title);
        let hi = match app.scene() {
            Some(ActiveScene::Title(title)) => title.hi_score(),
            _ => 0,
        };
        assert_eq!(hi, 500);
    }

    #[test]
    fn escape_exits_the_app() {
        let mut app = started(&MemoryStore::default());
        let mut screen = screen();
        app.update(&mut screen);
        app.handle_key_event(Key::Escape, true);
        assert!(!app.should_exit());
        app.update(&mut screen);
        app.update(&mut screen);
        assert!(app.should_exit());
    }

    #[test]
    fn window_close_exits_the_app() {
        let mut app = started(&MemoryStore::default());
        let mut screen = screen();
        app.handle_quit();
        app.update(&mut screen);
        app.update(&mut screen);
        assert!(app.should_exit());
    }

    #[test]
    fn placing_score_is_named_saved_and_becomes_the_hi_score() {
        let store = MemoryStore::default();
        let mut app = started(&store);
        let mut screen = screen();
        run_until(&mut app, &mut screen, on_title);
        press(&mut app, Key::C);
        press(&mut app, Key::Return);
        run_until(&mut app, &mut screen, in_game);
        if let Some(ActiveScene::Game(game)) = app.scene() {
            assert_eq!(game.credits(), 1);
        }

        lose_with(&mut app, 700);
        run_until(&mut app, &mut screen, on_board);
        if let Some(ActiveScene::Leaderboard(board)) = app.scene() {
            assert_eq!(board.p1_score(), 700);
            assert_eq!(board.hi_score(), 700);
            assert_eq!(board.ranking(), Ranking::EnteringName);
        }
        // Nothing is saved until the name is in.
        assert!(store.0.borrow().is_none());

        press(&mut app, Key::Right);
        press(&mut app, Key::Return);
        press(&mut app, Key::Return);
        run_until(&mut app, &mut screen, on_title);

        let saved = store.load().unwrap();
        assert_eq!(saved[0], Entry::new("BAA", 700).unwrap());
        assert_eq!(saved[1], Entry::new(PLACEHOLDER_NAME, 0).unwrap());
        assert_eq!(app.board(), saved.as_slice());
        if let Some(ActiveScene::Title(title)) = app.scene() {
            assert_eq!(title.hi_score(), 700);
            assert_eq!(title.credits(), 1);
        }
        assert!(!app.should_exit());
    }

    #[test]
    fn score_that_does_not_place_is_not_saved() {
        let store = MemoryStore::default();
        let mut app = started(&store);
        let mut screen = screen();
        press(&mut app, Key::Return);
        run_until(&mut app, &mut screen, on_title);
        press(&mut app, Key::Return);
        run_until(&mut app, &mut screen, in_game);

        lose_with(&mut app, 0);
        run_until(&mut app, &mut screen, on_board);
        if let Some(ActiveScene::Leaderboard(board)) = app.scene() {
            assert_eq!(board.ranking(), Ranking::Showing);
        }
        press(&mut app, Key::Space);
        run_until(&mut app, &mut screen, on_title);
        assert!(store.0.borrow().is_none());
    }

    #[test]
    fn frame_is_painted() {
        let mut app = started(&MemoryStore::default());
        let mut screen = screen();
        app.update(&mut screen);
        assert!(screen.iter().any(|&b| b != 0));
    }
}

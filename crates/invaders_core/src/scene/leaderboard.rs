use invaders_common::color::Color;
use log::{debug, info};

use crate::entity::Position;
use crate::input::{Action, Event};
use crate::leaderboard::{self, Entry, MAX_NAME_LEN};
use crate::render::{draw_text, Rect, Surface};
use crate::sprites::GLYPH_ADVANCE;
use crate::{FRAME_RATE_HZ, SCREEN_WIDTH};

use super::{draw_centered, draw_scores, render_cellophane, Fade, Scene};

/// Ticks the board stays up unless dismissed.
pub const SHOW_FRAMES: u32 = 10 * FRAME_RATE_HZ;

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Horizontal distance between name letters while entering them.
const LETTER_SPACING: i32 = 16;
const NAME_Y: i32 = 136;
const BOARD_TOP: i32 = 72;
const ROW_HEIGHT: i32 = 14;
const BLINK_FRAMES: u32 = 15;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ranking {
    /// The score made the board; Left/Right pick a letter, fire moves on,
    /// confirm accepts.
    EnteringName,
    Showing,
}

/// Shown after every game: name entry for a placing score, then the board.
///
/// The scene only edits its own copy of the board. Whoever runs it saves
/// `board()` afterwards when `recorded()` says it changed.
#[derive(Debug)]
pub struct LeaderboardScene {
    board: Vec<Entry>,
    p1_score: u32,
    hi_score: u32,
    ranking: Ranking,
    /// Letters as indexes into `ALPHABET`.
    letters: [u8; MAX_NAME_LEN],
    cursor: usize,
    /// Row of the score entered in this scene.
    new_row: Option<usize>,
    timer: u32,
    valid: bool,
    exiting: bool,
    fade: Fade,
}

impl LeaderboardScene {
    pub fn new(board: Vec<Entry>) -> Self {
        Self {
            hi_score: leaderboard::best_score(&board),
            board,
            p1_score: 0,
            ranking: Ranking::Showing,
            letters: [0; MAX_NAME_LEN],
            cursor: 0,
            new_row: None,
            timer: 0,
            valid: true,
            exiting: false,
            fade: Fade::default(),
        }
    }

    pub fn board(&self) -> &[Entry] {
        &self.board
    }

    /// Whether a new score went onto the board.
    pub fn recorded(&self) -> bool {
        self.new_row.is_some()
    }

    pub fn ranking(&self) -> Ranking {
        self.ranking
    }

    pub fn name(&self) -> String {
        self.letters
            .iter()
            .map(|&i| ALPHABET[i as usize % ALPHABET.len()] as char)
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn hi_score(&self) -> u32 {
        self.hi_score
    }

    pub fn set_hi_score(&mut self, score: u32) {
        self.hi_score = score;
    }

    pub fn p1_score(&self) -> u32 {
        self.p1_score
    }

    pub fn set_p1_score(&mut self, score: u32) {
        self.p1_score = score;
    }

    fn cycle_letter(&mut self, forward: bool) {
        let len = ALPHABET.len() as u8;
        if let Some(letter) = self.letters.get_mut(self.cursor) {
            *letter = if forward {
                (*letter + 1) % len
            } else {
                (*letter + len - 1) % len
            };
        }
    }

    fn next_letter(&mut self) {
        self.cursor += 1;
        if self.cursor >= MAX_NAME_LEN {
            self.submit();
        }
    }

    fn submit(&mut self) {
        let entry = Entry {
            name: self.name(),
            score: self.p1_score,
        };
        info!("{} enters the board with {}", entry.name, entry.score);
        // `record` ranks a new score below equal ones already there.
        let row = self.board.iter().filter(|e| e.score >= entry.score).count();
        leaderboard::record(&mut self.board, entry);
        self.new_row = Some(row);
        self.hi_score = self.hi_score.max(self.p1_score);
        self.ranking = Ranking::Showing;
        self.timer = 0;
    }

    fn exit(&mut self) {
        self.valid = false;
        self.exiting = true;
    }

    fn draw_name_entry(&self, surface: &mut dyn Surface) {
        draw_centered(surface, "NEW HIGH SCORE", 64);
        draw_centered(surface, &format!("{:04}", self.p1_score), 80);
        draw_centered(surface, "ENTER YOUR INITIALS", 112);

        let width = LETTER_SPACING * (MAX_NAME_LEN as i32 - 1) + GLYPH_ADVANCE;
        let left = (SCREEN_WIDTH as i32 - width) / 2;
        let name = self.name();
        for (i, ch) in name.chars().enumerate() {
            let x = left + LETTER_SPACING * i as i32;
            let letter = ch.to_string();
            draw_text(surface, &letter, Position::new(x, NAME_Y), Color::WHITE);
            if i == self.cursor {
                surface.fill_rect(Rect::new(x, NAME_Y + 9, 5, 1), Color::WHITE);
            }
        }
    }

    fn draw_board(&self, surface: &mut dyn Surface) {
        draw_centered(surface, "HIGH SCORES", 48);
        let blink_off = (self.timer / BLINK_FRAMES) % 2 == 1;
        for (i, entry) in self.board.iter().enumerate() {
            if blink_off && self.new_row == Some(i) {
                continue;
            }
            let line = format!("{:>2} {:<3} {:04}", i + 1, entry.name, entry.score);
            draw_centered(surface, &line, BOARD_TOP + ROW_HEIGHT * i as i32);
        }
    }
}

impl Scene for LeaderboardScene {
    fn start(&mut self) {
        self.valid = true;
        self.exiting = false;
        self.fade.reset();
        self.timer = 0;
        self.letters = [0; MAX_NAME_LEN];
        self.cursor = 0;
        self.new_row = None;
        self.hi_score = self.hi_score.max(leaderboard::best_score(&self.board));
        self.ranking = if leaderboard::qualifies(&self.board, self.p1_score) {
            Ranking::EnteringName
        } else {
            Ranking::Showing
        };
        debug!("Leaderboard start, score {} {:?}", self.p1_score, self.ranking);
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn process_event(&mut self, event: Event) {
        let key = match event {
            Event::Quit => {
                self.exit();
                return;
            }
            Event::Key { key, pressed: true } => key,
            Event::Key { .. } => return,
        };
        let Some(action) = Action::from_key(key) else {
            return;
        };
        match (self.ranking, action) {
            (_, Action::Quit) => self.exit(),
            (Ranking::EnteringName, Action::Left) => self.cycle_letter(false),
            (Ranking::EnteringName, Action::Right) => self.cycle_letter(true),
            (Ranking::EnteringName, Action::Fire) => self.next_letter(),
            (Ranking::EnteringName, Action::Confirm) => self.submit(),
            (Ranking::Showing, Action::Fire | Action::Confirm) => self.valid = false,
            _ => {}
        }
    }

    fn update(&mut self) {
        self.timer = self.timer.saturating_add(1);
        if self.ranking == Ranking::Showing && self.timer >= SHOW_FRAMES {
            self.valid = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        draw_scores(surface, self.p1_score, self.hi_score);
        match self.ranking {
            Ranking::EnteringName => self.draw_name_entry(surface),
            Ranking::Showing => self.draw_board(surface),
        }
    }

    fn render_overlay(&self, surface: &mut dyn Surface) {
        render_cellophane(surface);
        self.fade.render(surface);
    }

    fn end(&mut self) -> bool {
        self.fade.advance()
    }

    fn is_exiting(&self) -> bool {
        self.exiting
    }

    fn frame_rate(&self) -> u32 {
        FRAME_RATE_HZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{placeholder, MAX_ENTRIES};
    use invaders_common::key::Key;

    fn press(scene: &mut LeaderboardScene, key: Key) {
        scene.process_event(Event::Key { key, pressed: true });
    }

    fn scene_for(board: Vec<Entry>, score: u32) -> LeaderboardScene {
        let mut scene = LeaderboardScene::new(board);
        scene.set_p1_score(score);
        scene.start();
        scene
    }

    #[test]
    fn placing_score_enters_a_name() {
        let mut scene = scene_for(placeholder(), 700);
        assert_eq!(scene.ranking(), Ranking::EnteringName);
        assert_eq!(scene.name(), "AAA");

        press(&mut scene, Key::Left);
        assert_eq!(scene.name(), "ZAA");
        press(&mut scene, Key::Right);
        press(&mut scene, Key::Right);
        press(&mut scene, Key::Space);
        assert_eq!(scene.cursor(), 1);
        press(&mut scene, Key::D);
        press(&mut scene, Key::Space);
        press(&mut scene, Key::Right);
        press(&mut scene, Key::Right);
        assert!(!scene.recorded());
        press(&mut scene, Key::Space);

        assert_eq!(scene.ranking(), Ranking::Showing);
        assert!(scene.recorded());
        assert_eq!(scene.board()[0], Entry::new("BBC", 700).unwrap());
        assert_eq!(scene.board().len(), 2);
        assert_eq!(scene.hi_score(), 700);
        assert!(scene.is_valid());
    }

    #[test]
    fn confirm_accepts_the_name_early() {
        let mut scene = scene_for(placeholder(), 50);
        press(&mut scene, Key::Right);
        press(&mut scene, Key::Return);
        assert_eq!(scene.board()[0], Entry::new("BAA", 50).unwrap());

        // The same key now dismisses the board.
        press(&mut scene, Key::Return);
        assert!(!scene.is_valid());
        assert!(!scene.is_exiting());
    }

    #[test]
    fn new_score_ranks_below_an_equal_one() {
        let board = vec![
            Entry::new("TOP", 900).unwrap(),
            Entry::new("MID", 500).unwrap(),
            Entry::new("LOW", 100).unwrap(),
        ];
        let mut scene = scene_for(board, 500);
        press(&mut scene, Key::Return);
        let names: Vec<_> = scene.board().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["TOP", "MID", "AAA", "LOW"]);
        assert_eq!(scene.new_row, Some(2));
    }

    #[test]
    fn score_off_the_board_just_shows_it() {
        let board: Vec<Entry> = (1..=MAX_ENTRIES as u32)
            .map(|i| Entry::new("ACE", i * 1000).unwrap())
            .collect();
        let mut scene = scene_for(board.clone(), 10);
        assert_eq!(scene.ranking(), Ranking::Showing);
        assert_eq!(scene.hi_score(), 10_000);

        for _ in 0..SHOW_FRAMES - 1 {
            scene.update();
        }
        assert!(scene.is_valid());
        scene.update();
        assert!(!scene.is_valid());
        assert!(!scene.recorded());
        assert_eq!(scene.board(), board.as_slice());
    }

    #[test]
    fn name_entry_has_no_time_limit() {
        let mut scene = scene_for(placeholder(), 10);
        for _ in 0..SHOW_FRAMES * 2 {
            scene.update();
        }
        assert!(scene.is_valid());
        assert_eq!(scene.ranking(), Ranking::EnteringName);
    }

    #[test]
    fn escape_quits_from_name_entry() {
        let mut scene = scene_for(placeholder(), 10);
        press(&mut scene, Key::Escape);
        assert!(scene.is_exiting());
        assert!(!scene.recorded());
    }
}

use invaders_common::color::Color;
use log::info;

use crate::bitmap::Bitmap;
use crate::entity::Position;
use crate::input::{Action, Event};
use crate::render::{draw_text, Surface};
use crate::sprites::SPRITES;
use crate::FRAME_RATE_HZ;

use super::{
    draw_centered, draw_credits, draw_scores, render_cellophane, typed_out, Fade, Scene,
    MAX_CREDITS, REVEAL_FRAMES,
};

const HEADER: [&str; 3] = ["PLAY", "SPACE INVADERS", "*SCORE ADVANCE TABLE*"];
const TABLE: [&str; 4] = ["=? MYSTERY", "=30 POINTS", "=20 POINTS", "=10 POINTS"];
const PROMPT: &str = "PUSH RETURN";
const TABLE_TOP: i32 = 144;
const TABLE_X: i32 = 88;
/// Ticks the prompt stays on, then off.
const BLINK_FRAMES: u32 = 30;

/// The attract screen: title, the score table and a start prompt.
///
/// Text types out a character at a time. Confirm or fire starts a game at
/// any point; coins are counted and handed on to the game.
#[derive(Debug, Default)]
pub struct TitleScene {
    hi_score: u32,
    credits: u32,
    timer: u32,
    valid: bool,
    exiting: bool,
    fade: Fade,
}

impl TitleScene {
    pub fn new(hi_score: u32, credits: u32) -> Self {
        Self {
            hi_score,
            credits: credits.min(MAX_CREDITS),
            ..Self::default()
        }
    }

    pub fn hi_score(&self) -> u32 {
        self.hi_score
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// Characters typed out so far, over the header and the table.
    pub fn revealed(&self) -> usize {
        (self.timer / REVEAL_FRAMES) as usize
    }

    pub fn fully_revealed(&self) -> bool {
        let total: usize = HEADER.iter().chain(TABLE.iter()).map(|l| l.len()).sum();
        self.revealed() >= total
    }

    fn table_sprites() -> [&'static Bitmap; 4] {
        [
            &SPRITES.ufo,
            &SPRITES.squid[0],
            &SPRITES.crab[0],
            &SPRITES.octopus[0],
        ]
    }
}

impl Scene for TitleScene {
    fn start(&mut self) {
        info!("Title, hi-score {}", self.hi_score);
        self.timer = 0;
        self.valid = true;
        self.exiting = false;
        self.fade.reset();
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn process_event(&mut self, event: Event) {
        let key = match event {
            Event::Quit => {
                self.valid = false;
                self.exiting = true;
                return;
            }
            Event::Key { key, pressed: true } => key,
            Event::Key { .. } => return,
        };
        match Action::from_key(key) {
            Some(Action::Quit) => {
                self.valid = false;
                self.exiting = true;
            }
            Some(Action::Confirm | Action::Fire) => self.valid = false,
            Some(Action::Coin) => self.credits = (self.credits + 1).min(MAX_CREDITS),
            _ => {}
        }
    }

    fn update(&mut self) {
        self.timer = self.timer.saturating_add(1);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        draw_scores(surface, 0, self.hi_score);
        draw_credits(surface, self.credits);

        let lines: Vec<&str> = HEADER.iter().chain(TABLE.iter()).copied().collect();
        let shown = typed_out(&lines, self.revealed());
        for (i, line) in shown.iter().take(HEADER.len()).enumerate() {
            draw_centered(surface, line, 64 + 24 * i as i32);
        }

        let rows = shown.iter().skip(HEADER.len());
        for (i, (line, sprite)) in rows.zip(Self::table_sprites()).enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = TABLE_TOP + 16 * i as i32;
            let x = TABLE_X - 8 - sprite.width();
            surface.blit(sprite, Position::new(x, y), Color::WHITE);
            draw_text(surface, line, Position::new(TABLE_X, y), Color::WHITE);
        }

        if self.fully_revealed() && (self.timer / BLINK_FRAMES) % 2 == 0 {
            draw_centered(surface, PROMPT, 216);
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

mod credits;
mod game;
mod leaderboard;
mod title;

use invaders_common::color::Color;

use crate::entity::Position;
use crate::input::Event;
use crate::render::{draw_text, Rect, Surface};
use crate::sprites::GLYPH_ADVANCE;
use crate::SCREEN_WIDTH;

pub use credits::{CreditScene, CREDITS_FRAMES};
pub use game::{
    GameScene, GameSceneInit, Phase, GAME_OVER_HOLD, GAME_OVER_TEXT, LEVEL_DROP,
    MAX_LEVEL_DROPS, UFO_INTERVAL, UFO_MIN_ALIENS,
};
pub use leaderboard::{LeaderboardScene, Ranking, SHOW_FRAMES};
pub use title::TitleScene;

/// Length of the fade run by `end`.
pub const FADE_FRAMES: u32 = 30;
/// Ticks per revealed character of typed-out messages.
pub const REVEAL_FRAMES: u32 = 6;
pub const MAX_CREDITS: u32 = 99;

/// What the external scene loop drives.
///
/// The loop calls `start` once, then `process_event`, `update`, `draw` and
/// `render_overlay` every frame while `is_valid`. Afterwards it calls `end`
/// once per frame until it returns true, unless the scene `is_exiting`.
pub trait Scene {
    fn start(&mut self);
    fn is_valid(&self) -> bool;
    fn process_event(&mut self, event: Event);
    fn update(&mut self);
    fn draw(&self, surface: &mut dyn Surface);
    fn render_overlay(&self, surface: &mut dyn Surface);
    /// Advance the teardown. Returns true once it has finished.
    fn end(&mut self) -> bool;
    fn is_exiting(&self) -> bool;
    fn frame_rate(&self) -> u32;
}

/// Fade to black over `FADE_FRAMES` calls of `advance`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fade(Option<u32>);

impl Fade {
    pub fn is_running(&self) -> bool {
        self.0.is_some()
    }

    pub fn reset(&mut self) {
        self.0 = None;
    }

    /// Returns true once the screen is fully black.
    pub fn advance(&mut self) -> bool {
        let elapsed = self.0.map_or(1, |n| n + 1);
        self.0 = Some(elapsed);
        elapsed >= FADE_FRAMES
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if let Some(elapsed) = self.0 {
            let left = FADE_FRAMES.saturating_sub(elapsed);
            surface.dim(left as u8, FADE_FRAMES as u8);
        }
    }
}

/// Emulate the cabinet's coloured cellophane.
pub fn render_cellophane(surface: &mut dyn Surface) {
    let width = SCREEN_WIDTH as i32;
    surface.tint_rect(Rect::new(0, 32, width, 32), Color::OVERLAY_RED);
    surface.tint_rect(Rect::new(0, 184, width, 56), Color::OVERLAY_GREEN);
    surface.tint_rect(Rect::new(25, 240, 111, 16), Color::OVERLAY_GREEN);
}

/// x that centres `text` on the screen.
pub fn centered_x(text: &str) -> i32 {
    (SCREEN_WIDTH as i32 - text.chars().count() as i32 * GLYPH_ADVANCE) / 2
}

pub fn draw_centered(surface: &mut dyn Surface, text: &str, y: i32) {
    draw_text(surface, text, Position::new(centered_x(text), y), Color::WHITE);
}

/// The score header every scene shows along the top.
pub fn draw_scores(surface: &mut dyn Surface, p1_score: u32, hi_score: u32) {
    draw_text(surface, "SCORE<1> HI-SCORE SCORE<2>", Position::new(8, 8), Color::WHITE);
    draw_text(surface, &format!("{p1_score:04}"), Position::new(24, 24), Color::WHITE);
    draw_text(surface, &format!("{hi_score:04}"), Position::new(88, 24), Color::WHITE);
    draw_text(surface, "0000", Position::new(168, 24), Color::WHITE);
}

pub fn draw_credits(surface: &mut dyn Surface, credits: u32) {
    draw_text(surface, &format!("CREDIT {credits:02}"), Position::new(136, 240), Color::WHITE);
}

/// Split `revealed` characters over `lines`, in order. Returns the visible
/// prefix of each line.
pub fn typed_out<'a>(lines: &[&'a str], mut revealed: usize) -> Vec<&'a str> {
    lines
        .iter()
        .map(|&line| {
            let shown = revealed.min(line.len());
            revealed -= shown;
            &line[..shown]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameBuffer;
    use crate::SCREEN_HEIGHT;

    #[test]
    fn fade_finishes_after_its_length() {
        let mut fade = Fade::default();
        assert!(!fade.is_running());
        let mut calls = 1;
        while !fade.advance() {
            calls += 1;
        }
        assert_eq!(calls, FADE_FRAMES);
        assert!(fade.is_running());
        fade.reset();
        assert!(!fade.is_running());
    }

    #[test]
    fn finished_fade_is_black() {
        let mut pixels = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
        let mut fb = FrameBuffer::new(&mut pixels, SCREEN_WIDTH, SCREEN_HEIGHT);
        fb.clear(Color::WHITE);
        let mut fade = Fade::default();
        while !fade.advance() {}
        fade.render(&mut fb);
        assert_eq!(fb.pixel(100, 100), Color::BLACK);
    }

    #[test]
    fn lines_type_out_in_order() {
        let lines = ["PLAY", "SPACE"];
        assert_eq!(typed_out(&lines, 0), vec!["", ""]);
        assert_eq!(typed_out(&lines, 3), vec!["PLA", ""]);
        assert_eq!(typed_out(&lines, 6), vec!["PLAY", "SP"]);
        assert_eq!(typed_out(&lines, 100), vec!["PLAY", "SPACE"]);
    }

    #[test]
    fn centring_uses_the_glyph_cell() {
        assert_eq!(centered_x("GAME OVER"), (224 - 72) / 2);
    }
}

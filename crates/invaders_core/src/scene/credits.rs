use invaders_common::color::Color;
use log::info;

use crate::input::{Action, Event};
use crate::render::Surface;
use crate::FRAME_RATE_HZ;

use super::{draw_centered, render_cellophane, Fade, Scene};

/// Ticks the card stays up unless skipped.
pub const CREDITS_FRAMES: u32 = 3 * FRAME_RATE_HZ;

const LINES: [&str; 4] = [
    "SPACE INVADERS",
    "A RECREATION OF THE",
    "1978 ARCADE GAME",
    "WRITTEN IN RUST",
];

/// The card shown once when the program starts.
#[derive(Debug, Default)]
pub struct CreditScene {
    timer: u32,
    valid: bool,
    exiting: bool,
    fade: Fade,
}

impl CreditScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for CreditScene {
    fn start(&mut self) {
        info!("Credits");
        self.timer = 0;
        self.valid = true;
        self.exiting = false;
        self.fade.reset();
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Quit => {
                self.valid = false;
                self.exiting = true;
            }
            Event::Key { key, pressed: true } => match Action::from_key(key) {
                Some(Action::Quit) => {
                    self.valid = false;
                    self.exiting = true;
                }
                Some(Action::Confirm | Action::Fire) => self.valid = false,
                _ => {}
            },
            Event::Key { .. } => {}
        }
    }

    fn update(&mut self) {
        self.timer += 1;
        if self.timer >= CREDITS_FRAMES {
            self.valid = false;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        for (i, line) in LINES.iter().enumerate() {
            draw_centered(surface, line, 96 + 16 * i as i32);
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
    use invaders_common::key::Key;

    #[test]
    fn card_times_out() {
        let mut scene = CreditScene::new();
        scene.start();
        for _ in 0..CREDITS_FRAMES - 1 {
            scene.update();
        }
        assert!(scene.is_valid());
        scene.update();
        assert!(!scene.is_valid());
        assert!(!scene.is_exiting());
    }

    #[test]
    fn return_skips_and_escape_quits() {
        let mut scene = CreditScene::new();
        scene.start();
        scene.process_event(Event::Key { key: Key::Return, pressed: true });
        assert!(!scene.is_valid());
        assert!(!scene.is_exiting());

        scene.start();
        scene.process_event(Event::Key { key: Key::Escape, pressed: true });
        assert!(scene.is_exiting());
    }
}

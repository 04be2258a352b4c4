use bitflags::bitflags;
use invaders_common::key::Key;

/// Per-frame input delivered by the frontend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Key { key: Key, pressed: bool },
    /// The window was closed.
    Quit,
}

/// What a key means to the game scene.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Fire,
    Confirm,
    Coin,
    Quit,
}

impl Action {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::A | Key::Left => Some(Action::Left),
            Key::D | Key::Right => Some(Action::Right),
            Key::S | Key::Space | Key::Up => Some(Action::Fire),
            Key::Return => Some(Action::Confirm),
            Key::C => Some(Action::Coin),
            Key::Escape => Some(Action::Quit),
            _ => None,
        }
    }
}

bitflags! {
    /// Controls currently held down.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Controls: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const FIRE = 1 << 2;
    }
}

impl Controls {
    /// Track a press or release. Actions that aren't held controls are ignored.
    pub fn apply(&mut self, action: Action, pressed: bool) {
        let flag = match action {
            Action::Left => Controls::LEFT,
            Action::Right => Controls::RIGHT,
            Action::Fire => Controls::FIRE,
            _ => return,
        };
        self.set(flag, pressed);
    }

    /// Horizontal velocity implied by the held directions.
    pub fn velocity(self) -> i32 {
        let mut v = 0;
        if self.contains(Controls::LEFT) {
            v -= 1;
        }
        if self.contains(Controls::RIGHT) {
            v += 1;
        }
        v
    }
}

use crate::FRAME_RATE_HZ;

/// Every sound the game scene can ask for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SoundId {
    Pulse1,
    Pulse2,
    Pulse3,
    Pulse4,
    Shoot,
    AlienExplode,
    PlayerDeath,
    BonusLife,
}

impl SoundId {
    pub const ALL: [SoundId; 8] = [
        SoundId::Pulse1,
        SoundId::Pulse2,
        SoundId::Pulse3,
        SoundId::Pulse4,
        SoundId::Shoot,
        SoundId::AlienExplode,
        SoundId::PlayerDeath,
        SoundId::BonusLife,
    ];

    /// The four marching tones, in the order they cycle.
    pub const PULSES: [SoundId; 4] = [
        SoundId::Pulse1,
        SoundId::Pulse2,
        SoundId::Pulse3,
        SoundId::Pulse4,
    ];

    pub fn channel(self) -> Channel {
        match self {
            SoundId::Pulse1 | SoundId::Pulse2 | SoundId::Pulse3 | SoundId::Pulse4 => Channel::BGM,
            SoundId::Shoot | SoundId::AlienExplode | SoundId::PlayerDeath => Channel::EFFECTS,
            SoundId::BonusLife => Channel::BONUS,
        }
    }

    /// Sample path, relative to the directory the game is started from.
    pub fn file(self) -> &'static str {
        match self {
            SoundId::Pulse1 => "assets/sounds/sfx_menu_move1.wav",
            SoundId::Pulse2 => "assets/sounds/sfx_menu_move2.wav",
            SoundId::Pulse3 => "assets/sounds/sfx_menu_move3.wav",
            SoundId::Pulse4 => "assets/sounds/sfx_menu_move4.wav",
            SoundId::Shoot => "assets/sounds/sfx_wpn_laser9.wav",
            SoundId::AlienExplode => "assets/sounds/sfx_sounds_interaction25.wav",
            SoundId::PlayerDeath => "assets/sounds/sfx_exp_medium4.wav",
            SoundId::BonusLife => "assets/sounds/sfx_sounds_pause6_in.wav",
        }
    }
}

/// A mixer channel. Starting a sound on a channel cuts off whatever that
/// channel was playing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Channel(pub u8);

impl Channel {
    pub const BGM: Channel = Channel(0);
    pub const EFFECTS: Channel = Channel(1);
    pub const BONUS: Channel = Channel(2);
}

/// Fire-and-forget playback. Nothing here ever waits on a sound finishing.
pub trait AudioSink {
    fn play(&mut self, sound: SoundId);
    fn stop(&mut self, channel: Channel);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _sound: SoundId) {}

    fn stop(&mut self, _channel: Channel) {}
}

/// The marching heartbeat.
///
/// Plays one of four tones every `interval` ticks. The interval is only
/// re-evaluated after a full cycle of four, from the number of aliens still
/// alive, so the beat quickens along with the formation.
#[derive(Clone, Debug)]
pub struct Pulse {
    tone: usize,
    interval: u32,
    wait: u32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self::new()
    }
}

impl Pulse {
    pub const MIN_INTERVAL: u32 = 10;

    pub fn new() -> Self {
        Self {
            tone: 0,
            interval: FRAME_RATE_HZ,
            wait: 0,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Advance one tick. Returns the tone to play, if one is due.
    pub fn tick(&mut self, alive: usize) -> Option<SoundId> {
        if self.wait > 0 {
            self.wait -= 1;
            return None;
        }

        let sound = SoundId::PULSES[self.tone];
        self.tone += 1;
        if self.tone == SoundId::PULSES.len() {
            self.tone = 0;
            self.interval = (alive as u32 + 5).max(Self::MIN_INTERVAL);
        }
        self.wait = self.interval - 1;
        Some(sound)
    }
}

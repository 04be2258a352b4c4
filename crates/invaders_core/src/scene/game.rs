use std::collections::VecDeque;

use invaders_common::color::Color;
use invaders_common::key::Key;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use typed_builder::TypedBuilder;

use crate::audio::{AudioSink, Channel, Pulse, Silent, SoundId};
use crate::entity::{Alien, Body, Owner, Player, Position, Ufo};
use crate::formation::{Formation, FORMATION_TOP};
use crate::input::{Action, Controls, Event};
use crate::projectile::{Impact, Projectiles, Targets};
use crate::render::{draw_text, Rect, Surface};
use crate::shield::Shield;
use crate::sprites::SPRITES;
use crate::targeting::LineOfSight;
use crate::{FRAME_RATE_HZ, INVASION_Y, SCREEN_WIDTH};

use super::{
    draw_centered, draw_credits, draw_scores, render_cellophane, Fade, Scene, MAX_CREDITS,
    REVEAL_FRAMES,
};

/// Drop of the formation per cleared level.
pub const LEVEL_DROP: i32 = 8;
/// Levels after which the formation stops starting any lower.
pub const MAX_LEVEL_DROPS: u32 = 4;
/// Ticks between UFO appearances.
pub const UFO_INTERVAL: u64 = 1500;
/// The UFO only shows up while at least this many aliens remain.
pub const UFO_MIN_ALIENS: usize = 8;
pub const GAME_OVER_TEXT: &str = "GAME OVER";
/// Ticks the full game over message stays up before the scene ends.
pub const GAME_OVER_HOLD: u32 = 120;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Shields and aliens appear one per tick.
    Loading,
    Playing,
    /// Everything but the player's explosion is frozen.
    PlayerExploding,
    GameOver,
    /// The grid is empty; short pause before the next wave loads.
    LevelClear,
}

#[derive(TypedBuilder)]
pub struct GameSceneInit {
    #[builder(default = 0)]
    pub hi_score: u32,
    /// Coins inserted before the game started.
    #[builder(default = 0)]
    pub credits: u32,
    #[builder(default = FRAME_RATE_HZ)]
    pub frame_rate: u32,
    #[builder(default = Box::new(Silent) as Box<dyn AudioSink>)]
    pub audio: Box<dyn AudioSink>,
    #[builder(default = Box::new(StdRng::from_entropy()) as Box<dyn RngCore>)]
    pub rng: Box<dyn RngCore>,
}

enum Spawn {
    Shield(Shield),
    Alien(Alien),
}

/// One playthrough: waves, lives and score until the last life is lost.
pub struct GameScene {
    phase: Phase,
    valid: bool,
    exiting: bool,
    frame_rate: u32,
    frame: u64,
    level: u32,
    credits: u32,
    hi_score: u32,
    secret: bool,
    /// Ticks spent in the current timed phase.
    timer: u32,
    fade: Fade,

    controls: Controls,
    player: Player,
    formation: Formation,
    line_of_sight: LineOfSight,
    projectiles: Projectiles,
    shields: Vec<Shield>,
    ufo: Option<Ufo>,
    loading: VecDeque<Spawn>,

    pulse: Pulse,
    audio: Box<dyn AudioSink>,
    rng: Box<dyn RngCore>,
}

impl GameScene {
    pub fn new(init: GameSceneInit) -> Self {
        let GameSceneInit {
            hi_score,
            credits,
            frame_rate,
            audio,
            rng,
        } = init;
        Self {
            phase: Phase::Loading,
            valid: true,
            exiting: false,
            frame_rate,
            frame: 0,
            level: 1,
            credits: credits.min(MAX_CREDITS),
            hi_score,
            secret: false,
            timer: 0,
            fade: Fade::default(),
            controls: Controls::empty(),
            player: Player::default(),
            formation: Formation::new(),
            line_of_sight: LineOfSight::new(),
            projectiles: Projectiles::new(),
            shields: Vec::new(),
            ufo: None,
            loading: VecDeque::new(),
            pulse: Pulse::new(),
            audio,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Ticks since the current wave started loading.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn secret(&self) -> bool {
        self.secret
    }

    pub fn hi_score(&self) -> u32 {
        self.hi_score
    }

    pub fn set_hi_score(&mut self, score: u32) {
        self.hi_score = score;
    }

    pub fn p1_score(&self) -> u32 {
        self.player.score
    }

    pub fn set_p1_score(&mut self, score: u32) {
        self.player.score = score;
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn formation_mut(&mut self) -> &mut Formation {
        &mut self.formation
    }

    pub fn line_of_sight(&self) -> &LineOfSight {
        &self.line_of_sight
    }

    pub fn projectiles(&self) -> &Projectiles {
        &self.projectiles
    }

    pub fn shields(&self) -> &[Shield] {
        &self.shields
    }

    pub fn ufo(&self) -> Option<&Ufo> {
        self.ufo.as_ref()
    }

    /// y of the top formation row for the current level.
    pub fn formation_top(&self) -> i32 {
        FORMATION_TOP + LEVEL_DROP * (self.level - 1).min(MAX_LEVEL_DROPS) as i32
    }

    /// Reset the playfield and queue the loading animation for this level.
    fn begin_level(&mut self) {
        self.formation = Formation::new();
        self.line_of_sight.reset();
        self.projectiles.clear();
        self.shields.clear();
        self.ufo = None;
        self.pulse = Pulse::new();
        self.player.respawn();
        self.frame = 0;
        self.timer = 0;

        self.loading = Shield::row()
            .into_iter()
            .map(Spawn::Shield)
            .chain(
                Formation::layout(self.formation_top())
                    .into_iter()
                    .map(Spawn::Alien),
            )
            .collect();
        self.phase = Phase::Loading;
        debug!("Level {} loading, formation top at {}", self.level, self.formation_top());
    }

    fn update_loading(&mut self) {
        match self.loading.pop_front() {
            Some(Spawn::Shield(shield)) => self.shields.push(shield),
            Some(Spawn::Alien(alien)) => self.formation.place(alien),
            None => {}
        }
        if self.loading.is_empty() {
            self.formation.arm();
            self.line_of_sight.update(&self.formation);
            self.phase = Phase::Playing;
            info!("Level {} start", self.level);
        }
    }

    fn update_playing(&mut self) {
        if self.player.is_exploding() {
            self.phase = Phase::PlayerExploding;
            return;
        }
        if self.player.lives == 0 {
            self.enter_game_over();
            return;
        }
        if self.formation.alive_count() == 0 {
            self.enter_level_clear();
            return;
        }

        if let Some(tone) = self.pulse.tick(self.formation.alive_count()) {
            self.audio.play(tone);
        }

        self.player.velocity = self.controls.velocity();
        self.player.shooting = self.controls.contains(Controls::FIRE);
        self.player.step();
        if self.player.shooting && self.projectiles.fire(Owner::Player, self.player.muzzle()) {
            self.audio.play(SoundId::Shoot);
        }

        let impacts = self.projectiles.resolve(Targets {
            formation: &mut self.formation,
            line_of_sight: &mut self.line_of_sight,
            ufo: self.ufo.as_mut(),
            shields: &mut self.shields,
            player: &mut self.player,
        });
        for impact in impacts {
            self.apply(impact);
        }
        if self.player.is_exploding() {
            return;
        }

        self.line_of_sight.update(&self.formation);
        self.alien_fire();

        self.formation.tick_explosions();
        self.formation.step(&mut self.line_of_sight);

        if self
            .formation
            .lowest_y()
            .is_some_and(|y| y >= INVASION_Y)
        {
            info!("The invaders have landed");
            self.player.lives = 0;
            self.player.explode();
            self.projectiles.clear();
            self.audio.play(SoundId::PlayerDeath);
            return;
        }

        self.update_ufo();
    }

    /// With no alien bullet in flight, a random column's shooter fires. An
    /// empty column means nobody fires this tick.
    fn alien_fire(&mut self) {
        if self.projectiles.has(Owner::Alien) {
            return;
        }
        let shooter = self
            .line_of_sight
            .pick(self.rng.as_mut())
            .and_then(|pos| self.formation.get(pos))
            .filter(|alien| alien.is_alive())
            .map(|alien| alien.muzzle());
        if let Some(muzzle) = shooter {
            self.projectiles.fire(Owner::Alien, muzzle);
        }
    }

    fn update_ufo(&mut self) {
        let keep = self.ufo.as_mut().is_some_and(|ufo| ufo.tick());
        if !keep {
            self.ufo = None;
        }
        if self.ufo.is_none()
            && self.frame > 0
            && self.frame % UFO_INTERVAL == 0
            && self.formation.alive_count() >= UFO_MIN_ALIENS
        {
            let from_left = self.rng.gen_bool(0.5);
            debug!("UFO enters from the {}", if from_left { "left" } else { "right" });
            self.ufo = Some(Ufo::new(from_left));
        }
    }

    fn apply(&mut self, impact: Impact) {
        match impact {
            Impact::Alien { points, .. } | Impact::Ufo { points } => {
                self.audio.play(SoundId::AlienExplode);
                self.award(points);
            }
            Impact::Player => {
                info!("Player hit, {} lives left", self.player.lives);
                self.audio.play(SoundId::PlayerDeath);
            }
            Impact::Shield | Impact::Miss | Impact::Ground => {}
        }
    }

    fn award(&mut self, points: u32) {
        if self.player.award(points) {
            info!("Bonus life, now {}", self.player.lives);
            self.audio.play(SoundId::BonusLife);
        }
        self.hi_score = self.hi_score.max(self.player.score);
    }

    fn update_player_exploding(&mut self) {
        if !self.player.tick_explosion() {
            return;
        }
        self.player.lives = self.player.lives.saturating_sub(1);
        if self.player.lives == 0 {
            self.enter_game_over();
        } else {
            self.player.respawn();
            self.projectiles.clear();
            self.phase = Phase::Playing;
        }
    }

    fn enter_game_over(&mut self) {
        info!("Game over with {} points", self.player.score);
        self.hi_score = self.hi_score.max(self.player.score);
        self.projectiles.clear();
        self.ufo = None;
        self.timer = 0;
        self.phase = Phase::GameOver;
    }

    /// Characters of the game over message shown so far.
    pub fn revealed(&self) -> usize {
        if self.phase != Phase::GameOver {
            return 0;
        }
        ((self.timer / REVEAL_FRAMES) as usize).min(GAME_OVER_TEXT.len())
    }

    fn update_game_over(&mut self) {
        self.timer += 1;
        if self.timer >= GAME_OVER_TEXT.len() as u32 * REVEAL_FRAMES + GAME_OVER_HOLD {
            self.valid = false;
        }
    }

    fn enter_level_clear(&mut self) {
        info!("Level {} cleared", self.level);
        self.controls = Controls::empty();
        self.player.velocity = 0;
        self.player.shooting = false;
        self.projectiles.clear();
        self.ufo = None;
        self.timer = 0;
        self.phase = Phase::LevelClear;
    }

    fn update_level_clear(&mut self) {
        // The last alien's explosion plays out during the pause.
        self.formation.tick_explosions();
        self.timer += 1;
        if self.timer >= self.frame_rate {
            self.level += 1;
            self.begin_level();
        }
    }

    fn quit(&mut self) {
        info!("Quit requested");
        self.valid = false;
        self.exiting = true;
    }

    fn draw_hud(&self, surface: &mut dyn Surface) {
        draw_scores(surface, self.player.score, self.hi_score);
        if self.secret {
            draw_text(surface, "LULZSUN", Position::new(80, 32), Color::WHITE);
        }

        surface.fill_rect(Rect::new(0, 239, SCREEN_WIDTH as i32, 1), Color::WHITE);
        draw_text(surface, &self.player.lives.to_string(), Position::new(8, 240), Color::WHITE);
        // Reserve ships: the one in play isn't shown. The strip fits seven.
        for i in 0..self.player.lives.saturating_sub(1).min(7) {
            let at = Position::new(24 + 16 * i as i32, 240);
            surface.blit(&SPRITES.player, at, Color::WHITE);
        }
        draw_credits(surface, self.credits);
    }
}

impl Scene for GameScene {
    fn start(&mut self) {
        info!("Game scene start, hi-score {}", self.hi_score);
        self.valid = true;
        self.exiting = false;
        self.fade.reset();
        self.begin_level();
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn process_event(&mut self, event: Event) {
        let (key, pressed) = match event {
            Event::Quit => {
                self.quit();
                return;
            }
            Event::Key { key, pressed } => (key, pressed),
        };
        let Some(action) = Action::from_key(key) else {
            if key != Key::None {
                debug!("Unbound key {:?}", key);
            }
            return;
        };
        match action {
            Action::Quit if pressed => self.quit(),
            Action::Confirm if pressed => self.secret = !self.secret,
            Action::Coin if pressed => self.credits = (self.credits + 1).min(MAX_CREDITS),
            _ => self.controls.apply(action, pressed),
        }
    }

    fn update(&mut self) {
        if !self.valid {
            return;
        }
        self.frame += 1;
        match self.phase {
            Phase::Loading => self.update_loading(),
            Phase::Playing => self.update_playing(),
            Phase::PlayerExploding => self.update_player_exploding(),
            Phase::GameOver => self.update_game_over(),
            Phase::LevelClear => self.update_level_clear(),
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BLACK);
        self.draw_hud(surface);

        for shield in &self.shields {
            surface.blit(shield.bitmap(), shield.position, Color::WHITE);
        }
        for alien in self.formation.iter().filter(|a| !a.is_finished()) {
            surface.blit(alien.bitmap(), alien.position, Color::WHITE);
        }
        if let Some(ufo) = &self.ufo {
            surface.blit(ufo.bitmap(), ufo.position, Color::WHITE);
        }
        if self.phase != Phase::Loading && !self.player.lifecycle().is_dead() {
            surface.blit(self.player.bitmap(), self.player.position(), Color::WHITE);
        }
        for bullet in self.projectiles.iter() {
            surface.blit(bullet.bitmap(), bullet.position(), Color::WHITE);
        }

        if self.phase == Phase::GameOver {
            // Pad so the message types out from its final, centred spot.
            let width = GAME_OVER_TEXT.len();
            let shown = format!("{:<width$}", &GAME_OVER_TEXT[..self.revealed()]);
            draw_centered(surface, &shown, 48);
        }
    }

    fn render_overlay(&self, surface: &mut dyn Surface) {
        render_cellophane(surface);
        self.fade.render(surface);
    }

    fn end(&mut self) -> bool {
        if !self.fade.is_running() {
            debug!("Game scene ending");
            self.audio.stop(Channel::BGM);
        }
        self.fade.advance()
    }

    fn is_exiting(&self) -> bool {
        self.exiting
    }

    fn frame_rate(&self) -> u32 {
        self.frame_rate
    }
}

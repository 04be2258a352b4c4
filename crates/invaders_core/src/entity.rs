use crate::bitmap::Bitmap;
use crate::sprites::SPRITES;
use crate::{
    ALIEN_BULLET_SPEED, BONUS_LIFE_POINTS, EXPLOSION_FRAMES, PLAYER_BULLET_SPEED,
    PLAYER_EXPLOSION_FRAMES, PLAYER_MAX_X, PLAYER_MIN_X, PLAYER_Y, STARTING_LIVES,
};

/// Integer pixel coordinates, top-left origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Where an entity is in its life.
///
/// Exploding entities ignore damage and movement; the counter advances once
/// per tick and the entity becomes `Dead` when it reaches the terminal count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Exploding(u32),
    Dead,
}

impl Lifecycle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Alive)
    }

    #[inline]
    pub fn is_exploding(&self) -> bool {
        matches!(self, Lifecycle::Exploding(_))
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self, Lifecycle::Dead)
    }

    /// Start exploding. Returns false if already exploding or dead.
    pub fn explode(&mut self) -> bool {
        if self.is_alive() {
            *self = Lifecycle::Exploding(1);
            true
        } else {
            false
        }
    }

    /// Advance an explosion by one tick. Returns true on the tick it finishes.
    pub fn advance(&mut self, terminal: u32) -> bool {
        if let Lifecycle::Exploding(frame) = self {
            *frame += 1;
            if *frame >= terminal {
                *self = Lifecycle::Dead;
                return true;
            }
        }
        false
    }

    /// Current explosion frame, zero when not exploding.
    pub fn explosion_frame(&self) -> u32 {
        match self {
            Lifecycle::Exploding(frame) => *frame,
            _ => 0,
        }
    }
}

/// Anything that occupies pixels on the playfield.
pub trait Body {
    /// Top-left corner of the current bitmap.
    fn position(&self) -> Position;
    fn bitmap(&self) -> &Bitmap;
    /// Only alive bodies can collide.
    fn is_alive(&self) -> bool;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AlienKind {
    Squid,
    Crab,
    Octopus,
    /// The bonus saucer. Never part of the grid.
    Cuttlefish,
}

impl AlienKind {
    pub fn points(self) -> u32 {
        match self {
            AlienKind::Squid => 30,
            AlienKind::Crab => 20,
            AlienKind::Octopus => 10,
            AlienKind::Cuttlefish => 50,
        }
    }

    /// Idle animation frame `frame` (0 or 1).
    pub fn bitmap(self, frame: usize) -> &'static Bitmap {
        let frame = frame & 1;
        match self {
            AlienKind::Squid => &SPRITES.squid[frame],
            AlienKind::Crab => &SPRITES.crab[frame],
            AlienKind::Octopus => &SPRITES.octopus[frame],
            AlienKind::Cuttlefish => &SPRITES.ufo,
        }
    }

    /// Kind occupying formation row `row` (row 0 is the top).
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => AlienKind::Squid,
            1 | 2 => AlienKind::Crab,
            _ => AlienKind::Octopus,
        }
    }
}

/// Stable key of an alien inside the formation, fixed at spawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub column: usize,
    pub row: usize,
}

impl GridPos {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

#[derive(Clone, Debug)]
pub struct Alien {
    pub kind: AlienKind,
    pub grid_position: GridPos,
    pub position: Position,
    lifecycle: Lifecycle,
    frame: usize,
}

impl Alien {
    pub fn new(kind: AlienKind, grid_position: GridPos, position: Position) -> Self {
        Self {
            kind,
            grid_position,
            position,
            lifecycle: Lifecycle::Alive,
            frame: 0,
        }
    }

    pub fn points(&self) -> u32 {
        self.kind.points()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Explosion done; waiting to be purged from the formation.
    pub fn is_finished(&self) -> bool {
        self.lifecycle.is_dead()
    }

    /// Take one formation step and flip the idle animation.
    pub fn step(&mut self, dx: i32, dy: i32) {
        if self.lifecycle.is_alive() {
            self.position = self.position.offset(dx, dy);
            self.frame ^= 1;
        }
    }

    pub fn explode(&mut self) -> bool {
        self.lifecycle.explode()
    }

    pub fn tick_explosion(&mut self) -> bool {
        self.lifecycle.advance(EXPLOSION_FRAMES)
    }

    /// Where a shot fired by this alien appears: under its middle.
    pub fn muzzle(&self) -> Position {
        let bitmap = self.kind.bitmap(self.frame);
        self.position
            .offset(bitmap.width() / 2 - 1, bitmap.height())
    }
}

impl Body for Alien {
    fn position(&self) -> Position {
        self.position
    }

    fn bitmap(&self) -> &Bitmap {
        if self.lifecycle.is_alive() {
            self.kind.bitmap(self.frame)
        } else {
            &SPRITES.alien_explosion
        }
    }

    fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }
}

/// The bonus saucer crossing the top of the playfield.
#[derive(Clone, Debug)]
pub struct Ufo {
    pub position: Position,
    pub direction: i32,
    lifecycle: Lifecycle,
}

impl Ufo {
    pub const ROW_Y: i32 = 40;

    pub fn new(from_left: bool) -> Self {
        let (x, direction) = if from_left {
            (-SPRITES.ufo.width(), 1)
        } else {
            (crate::SCREEN_WIDTH as i32, -1)
        };
        Self {
            position: Position::new(x, Self::ROW_Y),
            direction,
            lifecycle: Lifecycle::Alive,
        }
    }

    pub fn points(&self) -> u32 {
        AlienKind::Cuttlefish.points()
    }

    pub fn explode(&mut self) -> bool {
        self.lifecycle.explode()
    }

    /// Move or animate one tick. Returns false once the saucer should be dropped.
    pub fn tick(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Alive => {
                self.position.x += self.direction;
                let w = SPRITES.ufo.width();
                self.position.x > -w && self.position.x < crate::SCREEN_WIDTH as i32
            }
            Lifecycle::Exploding(_) => !self.lifecycle.advance(EXPLOSION_FRAMES),
            Lifecycle::Dead => false,
        }
    }
}

impl Body for Ufo {
    fn position(&self) -> Position {
        self.position
    }

    fn bitmap(&self) -> &Bitmap {
        if self.lifecycle.is_alive() {
            &SPRITES.ufo
        } else {
            &SPRITES.alien_explosion
        }
    }

    fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Alien,
}

impl Owner {
    /// Fixed vertical velocity in pixels per tick.
    pub fn velocity(self) -> i32 {
        match self {
            Owner::Player => PLAYER_BULLET_SPEED,
            Owner::Alien => ALIEN_BULLET_SPEED,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub owner: Owner,
    position: Position,
    lifecycle: Lifecycle,
    missed: bool,
}

impl Bullet {
    pub fn new(owner: Owner, position: Position) -> Self {
        Self {
            owner,
            position,
            lifecycle: Lifecycle::Alive,
            missed: false,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_exploding(&self) -> bool {
        self.lifecycle.is_exploding()
    }

    pub fn advance(&mut self) {
        if self.lifecycle.is_alive() {
            self.position.y += self.owner.velocity();
        }
    }

    /// Step back to where the bullet was before its last advance.
    pub fn retreat(&mut self) {
        if self.lifecycle.is_alive() {
            self.position.y -= self.owner.velocity();
        }
    }

    /// Pop against whatever was hit. The splat is centred on the shot.
    pub fn explode(&mut self) -> bool {
        let shot_width = self.shot_bitmap().width();
        if self.lifecycle.explode() {
            self.position.x -= (SPRITES.shot_explosion.width() - shot_width) / 2;
            true
        } else {
            false
        }
    }

    /// Pop against the top of the playfield with the distinct "miss" splat.
    pub fn explode_miss(&mut self) -> bool {
        if self.explode() {
            self.missed = true;
            true
        } else {
            false
        }
    }

    pub fn is_miss(&self) -> bool {
        self.missed
    }

    /// Returns true on the tick the explosion finishes.
    pub fn tick_explosion(&mut self) -> bool {
        self.lifecycle.advance(EXPLOSION_FRAMES)
    }

    fn shot_bitmap(&self) -> &'static Bitmap {
        match self.owner {
            Owner::Player => &SPRITES.player_shot,
            // Wiggle every few pixels of travel.
            Owner::Alien => &SPRITES.alien_shot[((self.position.y / 3) & 1) as usize],
        }
    }
}

impl Body for Bullet {
    fn position(&self) -> Position {
        self.position
    }

    fn bitmap(&self) -> &Bitmap {
        match self.lifecycle {
            Lifecycle::Alive => self.shot_bitmap(),
            _ if self.missed => &SPRITES.shot_miss,
            _ => &SPRITES.shot_explosion,
        }
    }

    fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position_x: i32,
    /// One of -1, 0, +1.
    pub velocity: i32,
    pub shooting: bool,
    pub lives: u32,
    pub score: u32,
    /// Points collected towards the next bonus life.
    pub next_life: i32,
    lifecycle: Lifecycle,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position_x: PLAYER_MIN_X,
            velocity: 0,
            shooting: false,
            lives: STARTING_LIVES,
            score: 0,
            next_life: 0,
            lifecycle: Lifecycle::Alive,
        }
    }
}

impl Player {
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_exploding(&self) -> bool {
        self.lifecycle.is_exploding()
    }

    /// Apply velocity, clamped to the playfield.
    pub fn step(&mut self) {
        if self.lifecycle.is_alive() {
            self.position_x = (self.position_x + self.velocity).clamp(PLAYER_MIN_X, PLAYER_MAX_X);
        }
    }

    pub fn explode(&mut self) -> bool {
        self.velocity = 0;
        self.shooting = false;
        self.lifecycle.explode()
    }

    /// Returns true on the tick the explosion finishes.
    pub fn tick_explosion(&mut self) -> bool {
        self.lifecycle.advance(PLAYER_EXPLOSION_FRAMES)
    }

    /// Back at the left edge, alive, keeping score and lives.
    pub fn respawn(&mut self) {
        self.position_x = PLAYER_MIN_X;
        self.velocity = 0;
        self.shooting = false;
        self.lifecycle = Lifecycle::Alive;
    }

    /// Add points to the score and the bonus life accumulator.
    /// Returns true when a bonus life was granted.
    pub fn award(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        self.next_life += points as i32;
        if self.next_life >= BONUS_LIFE_POINTS {
            self.next_life -= BONUS_LIFE_POINTS;
            self.lives += 1;
            true
        } else {
            false
        }
    }

    /// Where the player's shot appears: just above the cannon's tip.
    pub fn muzzle(&self) -> Position {
        Position::new(self.position_x + SPRITES.player.width() / 2, PLAYER_Y - 5)
    }
}

impl Body for Player {
    fn position(&self) -> Position {
        Position::new(self.position_x, PLAYER_Y)
    }

    fn bitmap(&self) -> &Bitmap {
        match self.lifecycle {
            Lifecycle::Alive => &SPRITES.player,
            Lifecycle::Exploding(frame) => &SPRITES.player_explosion[((frame / 4) & 1) as usize],
            Lifecycle::Dead => &SPRITES.player_explosion[1],
        }
    }

    fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_runs_to_terminal_count() {
        let mut life = Lifecycle::Alive;
        assert!(life.explode());
        assert!(!life.explode());
        let mut ticks = 1;
        while !life.advance(EXPLOSION_FRAMES) {
            ticks += 1;
        }
        assert_eq!(ticks, EXPLOSION_FRAMES - 1);
        assert!(life.is_dead());
        assert!(!life.advance(EXPLOSION_FRAMES));
    }

    #[test]
    fn exploding_alien_ignores_movement() {
        let mut alien = Alien::new(AlienKind::Crab, GridPos::new(0, 1), Position::new(40, 80));
        alien.explode();
        alien.step(2, 8);
        assert_eq!(alien.position, Position::new(40, 80));
        assert!(!alien.is_alive());
    }

    #[test]
    fn alien_step_flips_idle_frame() {
        let mut alien = Alien::new(AlienKind::Squid, GridPos::new(0, 0), Position::new(0, 0));
        let before = alien.bitmap().clone();
        alien.step(2, 0);
        assert_ne!(alien.bitmap(), &before);
        alien.step(2, 0);
        assert_eq!(alien.bitmap(), &before);
    }

    #[test]
    fn point_values() {
        assert_eq!(AlienKind::Squid.points(), 30);
        assert_eq!(AlienKind::Crab.points(), 20);
        assert_eq!(AlienKind::Octopus.points(), 10);
        assert_eq!(AlienKind::Cuttlefish.points(), 50);
    }

    #[test]
    fn player_is_clamped() {
        let mut player = Player {
            velocity: -1,
            ..Player::default()
        };
        player.step();
        assert_eq!(player.position_x, PLAYER_MIN_X);
        player.position_x = PLAYER_MAX_X;
        player.velocity = 1;
        player.step();
        assert_eq!(player.position_x, PLAYER_MAX_X);
    }

    #[test]
    fn player_explosion_lasts_thirty_ticks() {
        let mut player = Player::default();
        player.explode();
        let mut ticks = 1;
        while !player.tick_explosion() {
            ticks += 1;
        }
        assert_eq!(ticks + 1, PLAYER_EXPLOSION_FRAMES);
    }

    #[test]
    fn bonus_life_keeps_the_overflow() {
        let mut player = Player {
            next_life: 1480,
            ..Player::default()
        };
        assert!(player.award(30));
        assert_eq!(player.lives, STARTING_LIVES + 1);
        assert_eq!(player.next_life, 10);
        assert_eq!(player.score, 30);

        assert!(!player.award(10));
        assert_eq!(player.next_life, 20);
    }

    #[test]
    fn bullet_moves_at_owner_speed() {
        let mut up = Bullet::new(Owner::Player, Position::new(50, 200));
        let mut down = Bullet::new(Owner::Alien, Position::new(50, 100));
        up.advance();
        down.advance();
        assert_eq!(up.position().y, 196);
        assert_eq!(down.position().y, 101);
    }

    #[test]
    fn miss_uses_its_own_splat() {
        let mut bullet = Bullet::new(Owner::Player, Position::new(50, 30));
        assert!(bullet.explode_miss());
        assert!(bullet.is_miss());
        assert_eq!(bullet.bitmap(), &SPRITES.shot_miss);
        assert!(!bullet.is_alive());
    }

    #[test]
    fn ufo_leaves_the_screen() {
        let mut ufo = Ufo::new(true);
        let mut ticks = 0;
        while ufo.tick() {
            ticks += 1;
        }
        assert!(ticks > crate::SCREEN_WIDTH as i32);
    }
}

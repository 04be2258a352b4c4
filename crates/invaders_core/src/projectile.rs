use crate::collision::is_colliding;
use crate::entity::{AlienKind, Body, Bullet, GridPos, Owner, Player, Position, Ufo};
use crate::formation::Formation;
use crate::shield::Shield;
use crate::targeting::LineOfSight;
use crate::{BULLET_BOTTOM, BULLET_TOP};

/// Something a bullet did this tick, for the scene to score and sound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Impact {
    Alien {
        kind: AlienKind,
        grid_position: GridPos,
        points: u32,
    },
    Ufo {
        points: u32,
    },
    Shield,
    Player,
    /// A player shot reached the top untouched.
    Miss,
    /// An alien shot fell past the player.
    Ground,
}

/// Everything the bullets can hit this tick.
pub struct Targets<'a> {
    pub formation: &'a mut Formation,
    pub line_of_sight: &'a mut LineOfSight,
    pub ufo: Option<&'a mut Ufo>,
    pub shields: &'a mut [Shield],
    pub player: &'a mut Player,
}

/// The live bullets. At most one per owner, enforced at spawn time.
#[derive(Clone, Debug, Default)]
pub struct Projectiles {
    bullets: Vec<Bullet>,
}

impl Projectiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter()
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    /// Does `owner` have a bullet on screen, exploding ones included?
    pub fn has(&self, owner: Owner) -> bool {
        self.bullets.iter().any(|b| b.owner == owner)
    }

    pub fn count(&self, owner: Owner) -> usize {
        self.bullets.iter().filter(|b| b.owner == owner).count()
    }

    /// Spawn a bullet unless its owner already has one. Returns whether it spawned.
    pub fn fire(&mut self, owner: Owner, at: Position) -> bool {
        if self.has(owner) {
            return false;
        }
        self.bullets.push(Bullet::new(owner, at));
        true
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
    }

    /// Advance every bullet one tick and resolve what it hits.
    ///
    /// Checks run aliens, then shields, then the player. A shot that kills
    /// an alien, or an alien shot that kills the player, ends resolution for
    /// this tick.
    pub fn resolve(&mut self, targets: Targets<'_>) -> Vec<Impact> {
        let Targets {
            formation,
            line_of_sight,
            mut ufo,
            shields,
            player,
        } = targets;
        let mut impacts = Vec::new();

        let mut i = 0;
        while i < self.bullets.len() {
            let bullet = &mut self.bullets[i];

            if bullet.is_exploding() {
                if bullet.tick_explosion() {
                    self.bullets.remove(i);
                } else {
                    i += 1;
                }
                continue;
            }

            bullet.advance();
            if bullet.position().y < BULLET_TOP {
                bullet.retreat();
                bullet.explode_miss();
                impacts.push(Impact::Miss);
                i += 1;
                continue;
            }
            if bullet.position().y > BULLET_BOTTOM {
                bullet.explode();
                impacts.push(Impact::Ground);
                i += 1;
                continue;
            }

            if bullet.owner == Owner::Player {
                let hit = formation
                    .iter()
                    .find(|alien| is_colliding(*alien, &*bullet))
                    .map(|alien| alien.grid_position);
                if let Some(pos) = hit {
                    if let Some(alien) = formation.get_mut(pos) {
                        alien.explode();
                        line_of_sight.clear(pos);
                        impacts.push(Impact::Alien {
                            kind: alien.kind,
                            grid_position: pos,
                            points: alien.points(),
                        });
                    }
                    self.bullets.remove(i);
                    return impacts;
                }

                if let Some(saucer) = ufo.as_deref_mut() {
                    if is_colliding(&*saucer, &*bullet) {
                        saucer.explode();
                        impacts.push(Impact::Ufo {
                            points: saucer.points(),
                        });
                        self.bullets.remove(i);
                        return impacts;
                    }
                }
            }

            if let Some(shield) = shields.iter_mut().find(|s| is_colliding(&**s, &*bullet)) {
                bullet.explode();
                shield.damage(&*bullet);
                impacts.push(Impact::Shield);
                i += 1;
                continue;
            }

            if is_colliding(&*player, &*bullet) {
                player.explode();
                self.bullets.clear();
                impacts.push(Impact::Player);
                return impacts;
            }

            i += 1;
        }
        impacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Alien, Lifecycle};
    use crate::formation::FORMATION_TOP;
    use crate::{EXPLOSION_FRAMES, PLAYER_Y};

    struct World {
        formation: Formation,
        los: LineOfSight,
        shields: Vec<Shield>,
        player: Player,
    }

    impl World {
        fn new(formation: Formation) -> Self {
            let mut los = LineOfSight::new();
            los.update(&formation);
            Self {
                formation,
                los,
                shields: Vec::new(),
                player: Player::default(),
            }
        }

        fn resolve(&mut self, projectiles: &mut Projectiles) -> Vec<Impact> {
            projectiles.resolve(Targets {
                formation: &mut self.formation,
                line_of_sight: &mut self.los,
                ufo: None,
                shields: &mut self.shields,
                player: &mut self.player,
            })
        }
    }

    #[test]
    fn one_bullet_per_owner() {
        let mut p = Projectiles::new();
        assert!(p.fire(Owner::Player, Position::new(50, 200)));
        assert!(!p.fire(Owner::Player, Position::new(60, 200)));
        assert!(p.fire(Owner::Alien, Position::new(50, 100)));
        assert!(!p.fire(Owner::Alien, Position::new(70, 100)));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn player_shot_kills_the_alien_it_touches() {
        let alien = Alien::new(
            AlienKind::Octopus,
            GridPos::new(2, 4),
            Position::new(100, 120),
        );
        let mut world = World::new(Formation::from_aliens([alien]));
        let mut p = Projectiles::new();
        p.fire(Owner::Player, Position::new(105, 132));

        let mut impacts = Vec::new();
        for _ in 0..10 {
            impacts.extend(world.resolve(&mut p));
            if !impacts.is_empty() {
                break;
            }
        }
        assert_eq!(
            impacts,
            vec![Impact::Alien {
                kind: AlienKind::Octopus,
                grid_position: GridPos::new(2, 4),
                points: 10,
            }]
        );
        assert!(p.is_empty());
        assert_eq!(world.los.shooter(2), None);
        let state = world.formation.get(GridPos::new(2, 4)).map(|a| a.lifecycle());
        assert_eq!(state, Some(Lifecycle::Exploding(1)));
    }

    #[test]
    fn only_one_alien_dies_per_shot() {
        let mut world = World::new(Formation::full(FORMATION_TOP));
        let mut p = Projectiles::new();
        let x = world.formation.get(GridPos::new(6, 4)).map(|a| a.position.x).unwrap_or(0);
        p.fire(Owner::Player, Position::new(x + 5, 200));
        let mut kills = 0;
        for _ in 0..60 {
            kills += world
                .resolve(&mut p)
                .iter()
                .filter(|i| matches!(i, Impact::Alien { .. }))
                .count();
        }
        assert_eq!(kills, 1);
        assert_eq!(world.formation.alive_count(), 54);
        assert!(world.formation.get(GridPos::new(6, 4)).is_some_and(|a| !a.is_alive()));
    }

    #[test]
    fn top_of_screen_is_a_miss() {
        let mut world = World::new(Formation::new());
        let mut p = Projectiles::new();
        p.fire(Owner::Player, Position::new(100, BULLET_TOP + 2));
        assert_eq!(world.resolve(&mut p), vec![Impact::Miss]);
        let bullet = p.iter().next().map(|b| (b.is_miss(), b.is_alive()));
        assert_eq!(bullet, Some((true, false)));
    }

    #[test]
    fn explosion_runs_out_and_frees_the_slot() {
        let mut world = World::new(Formation::new());
        let mut p = Projectiles::new();
        p.fire(Owner::Player, Position::new(100, BULLET_TOP + 2));
        world.resolve(&mut p);
        let mut ticks = 0;
        while p.has(Owner::Player) {
            assert!(!p.fire(Owner::Player, Position::new(100, 200)));
            world.resolve(&mut p);
            ticks += 1;
        }
        assert_eq!(ticks, EXPLOSION_FRAMES - 1);
        assert!(p.fire(Owner::Player, Position::new(100, 200)));
    }

    #[test]
    fn alien_shot_falls_past_the_bottom() {
        let mut world = World::new(Formation::new());
        world.player.position_x = 150;
        let mut p = Projectiles::new();
        p.fire(Owner::Alien, Position::new(20, BULLET_BOTTOM));
        assert_eq!(world.resolve(&mut p), vec![Impact::Ground]);
    }

    #[test]
    fn alien_shot_kills_player_and_clears_bullets() {
        let mut world = World::new(Formation::new());
        let mut p = Projectiles::new();
        let x = world.player.position_x + 5;
        p.fire(Owner::Alien, Position::new(x, PLAYER_Y - 1));
        p.fire(Owner::Player, Position::new(150, 150));
        let impacts = world.resolve(&mut p);
        assert_eq!(impacts, vec![Impact::Player]);
        assert!(world.player.is_exploding());
        assert!(p.is_empty());
    }

    #[test]
    fn player_shot_brings_down_the_saucer() {
        let mut formation = Formation::new();
        let mut los = LineOfSight::new();
        let mut player = Player::default();
        let mut ufo = Ufo::new(true);
        ufo.position = Position::new(100, Ufo::ROW_Y);
        let mut p = Projectiles::new();
        p.fire(Owner::Player, Position::new(108, Ufo::ROW_Y + 8));

        let impacts = p.resolve(Targets {
            formation: &mut formation,
            line_of_sight: &mut los,
            ufo: Some(&mut ufo),
            shields: &mut [],
            player: &mut player,
        });
        assert_eq!(impacts, vec![Impact::Ufo { points: 50 }]);
        assert!(!ufo.is_alive());
        assert!(p.is_empty());
    }

    #[test]
    fn shields_absorb_and_erode() {
        let mut world = World::new(Formation::new());
        world.shields.push(Shield::new(Position::new(40, 192)));
        let before = world.shields[0].bitmap().count();
        let mut p = Projectiles::new();
        p.fire(Owner::Alien, Position::new(50, 185));
        let mut impacts = Vec::new();
        for _ in 0..10 {
            impacts.extend(world.resolve(&mut p));
        }
        assert_eq!(impacts, vec![Impact::Shield]);
        assert!(world.shields[0].bitmap().count() < before);
        assert!(!world.player.is_exploding());
    }
}

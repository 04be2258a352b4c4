use rand::{Rng, RngCore};

use crate::entity::GridPos;
use crate::formation::Formation;
use crate::COLUMNS;

/// One shooter slot per formation column.
///
/// A slot names the alien closest to the player in that column: the only
/// one allowed to fire. An empty slot is refilled on the next `update` from
/// the column's survivors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineOfSight {
    slots: [Option<GridPos>; COLUMNS],
}

impl LineOfSight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.slots = [None; COLUMNS];
    }

    /// Shooter of `column`, if any. Out-of-range columns have none.
    pub fn shooter(&self, column: usize) -> Option<GridPos> {
        self.slots.get(column).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<GridPos>; COLUMNS] {
        &self.slots
    }

    /// Promote the lowest alive alien of every column whose slot is empty.
    pub fn update(&mut self, formation: &Formation) {
        let mut candidates: [Option<GridPos>; COLUMNS] = [None; COLUMNS];
        for alien in formation.iter().filter(|a| a.lifecycle().is_alive()) {
            let pos = alien.grid_position;
            if pos.column >= COLUMNS || self.slots[pos.column].is_some() {
                continue;
            }
            let best = &mut candidates[pos.column];
            if best.map_or(true, |b| pos.row > b.row) {
                *best = Some(pos);
            }
        }
        for (slot, candidate) in self.slots.iter_mut().zip(candidates) {
            if slot.is_none() {
                *slot = candidate;
            }
        }
    }

    /// Forget `pos` if it is its column's shooter. Stale positions are ignored.
    pub fn clear(&mut self, pos: GridPos) {
        if let Some(slot) = self.slots.get_mut(pos.column) {
            if *slot == Some(pos) {
                *slot = None;
            }
        }
    }

    /// Pick a uniformly random column and return its shooter. An empty
    /// column yields `None`; the caller simply doesn't fire this tick.
    pub fn pick(&self, rng: &mut dyn RngCore) -> Option<GridPos> {
        let column = rng.gen_range(0..COLUMNS);
        self.shooter(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ROWS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn full_grid_shooters_are_the_bottom_row() {
        let formation = Formation::full(64);
        let mut los = LineOfSight::new();
        los.update(&formation);
        for column in 0..COLUMNS {
            assert_eq!(los.shooter(column), Some(GridPos::new(column, ROWS - 1)));
        }
    }

    #[test]
    fn killing_a_shooter_promotes_the_one_above() {
        let mut formation = Formation::full(64);
        let mut los = LineOfSight::new();
        los.update(&formation);

        let bottom = GridPos::new(3, 4);
        if let Some(alien) = formation.get_mut(bottom) {
            alien.explode();
        }
        los.clear(bottom);
        assert_eq!(los.shooter(3), None);

        los.update(&formation);
        assert_eq!(los.shooter(3), Some(GridPos::new(3, 3)));
        // Nobody else moved.
        assert_eq!(los.shooter(2), Some(GridPos::new(2, 4)));
        assert_eq!(los.shooter(4), Some(GridPos::new(4, 4)));
    }

    #[test]
    fn exhausted_column_stays_empty() {
        let mut formation = Formation::full(64);
        let mut los = LineOfSight::new();
        for row in 0..ROWS {
            let pos = GridPos::new(0, row);
            if let Some(alien) = formation.get_mut(pos) {
                alien.explode();
            }
            los.clear(pos);
        }
        los.update(&formation);
        assert_eq!(los.shooter(0), None);
        assert!(los.shooter(1).is_some());
    }

    #[test]
    fn clearing_a_non_shooter_is_a_no_op() {
        let formation = Formation::full(64);
        let mut los = LineOfSight::new();
        los.update(&formation);
        let before = los.clone();
        los.clear(GridPos::new(5, 0));
        los.clear(GridPos::new(99, 0));
        assert_eq!(los, before);
    }

    #[test]
    fn pick_only_returns_installed_shooters() {
        let formation = Formation::full(64);
        let mut los = LineOfSight::new();
        los.update(&formation);
        los.clear(GridPos::new(7, 4));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            if let Some(pos) = los.pick(&mut rng) {
                assert_eq!(pos.row, ROWS - 1);
                assert_ne!(pos.column, 7);
            }
        }
    }
}

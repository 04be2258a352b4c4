use crate::entity::{Alien, AlienKind, Body, GridPos, Position};
use crate::targeting::LineOfSight;
use crate::{ALIEN_STEP_X, ALIEN_STEP_Y, COLUMNS, LEFT_EDGE, RIGHT_EDGE, ROWS};

/// x of column 0 when a wave spawns.
pub const FORMATION_LEFT: i32 = 16;
/// y of row 0 on the first level.
pub const FORMATION_TOP: i32 = 64;
pub const COLUMN_SPACING: i32 = 16;
pub const ROW_SPACING: i32 = 16;

/// The alien grid and its marching order.
///
/// Movement happens in passes. Arming a pass lists every alive alien in
/// row-major order; each tick the last entry still owed a step is drained
/// and that single alien moves. A full pass therefore takes as many ticks as
/// there were aliens, which is what makes a thinning grid speed up. When the
/// list runs dry the pass is over: finished explosions are purged, the edges
/// are checked and the next pass is armed.
#[derive(Clone, Debug)]
pub struct Formation {
    rows: Vec<Vec<Alien>>,
    owed: Vec<GridPos>,
    descending: bool,
    step_x: i32,
}

impl Default for Formation {
    fn default() -> Self {
        Self::new()
    }
}

impl Formation {
    /// An empty grid, ready to have aliens placed into it.
    pub fn new() -> Self {
        Self {
            rows: vec![Vec::new(); ROWS],
            owed: Vec::new(),
            descending: false,
            step_x: ALIEN_STEP_X,
        }
    }

    /// Every alien of a wave whose top row sits at `top`, in the order the
    /// loading animation places them: bottom row first, left to right.
    pub fn layout(top: i32) -> Vec<Alien> {
        (0..ROWS)
            .rev()
            .flat_map(|row| {
                (0..COLUMNS).map(move |column| {
                    Alien::new(
                        AlienKind::for_row(row),
                        GridPos::new(column, row),
                        Position::new(
                            FORMATION_LEFT + column as i32 * COLUMN_SPACING,
                            top + row as i32 * ROW_SPACING,
                        ),
                    )
                })
            })
            .collect()
    }

    /// A fully placed wave with its first pass armed.
    pub fn full(top: i32) -> Self {
        Self::from_aliens(Self::layout(top))
    }

    /// A grid holding exactly `aliens`, with its first pass armed.
    pub fn from_aliens(aliens: impl IntoIterator<Item = Alien>) -> Self {
        let mut formation = Self::new();
        for alien in aliens {
            formation.place(alien);
        }
        formation.arm();
        formation
    }

    /// Put an alien into its row, keeping the row ordered by column.
    /// Aliens for a row outside the grid are dropped.
    pub fn place(&mut self, alien: Alien) {
        let GridPos { column, row } = alien.grid_position;
        if let Some(cells) = self.rows.get_mut(row) {
            let at = cells
                .iter()
                .position(|a| a.grid_position.column > column)
                .unwrap_or(cells.len());
            cells.insert(at, alien);
        }
    }

    /// Start a fresh pass owing one step to every alive alien.
    pub fn arm(&mut self) {
        self.owed = self
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| a.grid_position)
            .collect();
    }

    /// Steps still owed in the current pass.
    pub fn x_budget(&self) -> usize {
        self.owed.len()
    }

    /// Drops still owed in the current pass; zero unless descending.
    pub fn y_budget(&self) -> usize {
        if self.descending {
            self.owed.len()
        } else {
            0
        }
    }

    /// Current horizontal step, negative when marching left.
    pub fn step_x(&self) -> i32 {
        self.step_x
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn rows(&self) -> &[Vec<Alien>] {
        &self.rows
    }

    /// Row-major, row 0 first.
    pub fn iter(&self) -> impl Iterator<Item = &Alien> {
        self.rows.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Alien> {
        self.rows.iter_mut().flatten()
    }

    pub fn get(&self, pos: GridPos) -> Option<&Alien> {
        self.rows
            .get(pos.row)?
            .iter()
            .find(|a| a.grid_position.column == pos.column)
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Alien> {
        self.rows
            .get_mut(pos.row)?
            .iter_mut()
            .find(|a| a.grid_position.column == pos.column)
    }

    /// Aliens still in the grid, exploding ones included.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    pub fn alive_count(&self) -> usize {
        self.iter().filter(|a| a.is_alive()).count()
    }

    /// y of the lowest alive alien.
    pub fn lowest_y(&self) -> Option<i32> {
        self.iter()
            .filter(|a| a.is_alive())
            .map(|a| a.position.y)
            .max()
    }

    /// Advance every running explosion by one frame.
    pub fn tick_explosions(&mut self) {
        for alien in self.iter_mut() {
            alien.tick_explosion();
        }
    }

    /// Move the next alien owed a step. Returns true when this tick
    /// completed a pass.
    pub fn step(&mut self, los: &mut LineOfSight) -> bool {
        let dx = self.step_x;
        let dy = if self.descending { ALIEN_STEP_Y } else { 0 };
        while let Some(pos) = self.owed.pop() {
            // Entries for aliens killed mid-pass are skipped without costing a tick.
            if let Some(alien) = self.get_mut(pos).filter(|a| a.is_alive()) {
                alien.step(dx, dy);
                break;
            }
        }
        if self.owed.is_empty() {
            self.finish_pass(los);
            true
        } else {
            false
        }
    }

    fn finish_pass(&mut self, los: &mut LineOfSight) {
        for row in self.rows.iter_mut() {
            row.retain(|alien| {
                if alien.is_finished() {
                    los.clear(alien.grid_position);
                    false
                } else {
                    true
                }
            });
        }

        let move_down = self.rows.iter().any(|row| Self::row_at_edge(row));
        if move_down {
            self.step_x = -self.step_x;
            log::debug!("formation meets the edge, now marching {}", self.step_x);
        }
        self.descending = move_down;
        self.arm();
    }

    /// An empty row never triggers the edge.
    fn row_at_edge(row: &[Alien]) -> bool {
        let mut alive = row.iter().filter(|a| a.is_alive());
        let Some(first) = alive.next() else {
            return false;
        };
        let last = alive.last().unwrap_or(first);
        first.position.x < LEFT_EDGE || last.position.x > RIGHT_EDGE
    }
}

use crate::bitmap::Bitmap;
use crate::entity::{Body, Position};
use crate::sprites::SPRITES;
use crate::{SHIELD_COUNT, SHIELD_Y};

/// A destructible bunker. Its bitmap is its shape: damage carves pixels out
/// of it and nothing ever puts them back.
#[derive(Clone, Debug)]
pub struct Shield {
    pub position: Position,
    bitmap: Bitmap,
}

impl Shield {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            bitmap: SPRITES.shield.clone(),
        }
    }

    /// The four bunkers of a fresh level, left to right.
    pub fn row() -> Vec<Shield> {
        (0..SHIELD_COUNT)
            .map(|i| {
                // 31 + 46.5 * i, truncated.
                let x = 31 + (93 * i as i32) / 2;
                Shield::new(Position::new(x, SHIELD_Y))
            })
            .collect()
    }

    /// Stamp the impactor's current bitmap onto the shield at the impact
    /// offset, clearing every covered pixel. Returns the pixels removed.
    pub fn damage<B: Body + ?Sized>(&mut self, impactor: &B) -> usize {
        let at = impactor.position();
        self.bitmap.carve(
            impactor.bitmap(),
            at.x - self.position.x,
            at.y - self.position.y,
        )
    }

    /// Fully eroded. Still kept in the scene, it just can't stop anything.
    pub fn is_destroyed(&self) -> bool {
        self.bitmap.count() == 0
    }
}

impl Body for Shield {
    fn position(&self) -> Position {
        self.position
    }

    fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    fn is_alive(&self) -> bool {
        true
    }
}

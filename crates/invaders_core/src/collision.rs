use crate::entity::Body;

/// Sprite-accurate hit test between two positioned bodies.
///
/// Anything not alive never collides. Otherwise the two current bitmaps are
/// placed at their absolute positions and tested pixel by pixel.
pub fn is_colliding<A, B>(a: &A, b: &B) -> bool
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    if !a.is_alive() || !b.is_alive() {
        return false;
    }
    let pa = a.position();
    let pb = b.position();
    a.bitmap().overlaps(b.bitmap(), pb.x - pa.x, pb.y - pa.y)
}

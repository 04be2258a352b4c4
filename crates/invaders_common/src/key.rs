/// Logical keys the frontends translate their native keycodes into.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    A,
    D,
    S,
    C,
    Left,
    Right,
    Up,
    Space,
    Return,
    Escape,
    None,
}

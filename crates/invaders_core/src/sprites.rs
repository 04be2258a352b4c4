use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::bitmap::Bitmap;

/// Every bitmap the game draws or collides with.
pub struct SpriteSheet {
    pub squid: [Bitmap; 2],
    pub crab: [Bitmap; 2],
    pub octopus: [Bitmap; 2],
    pub ufo: Bitmap,
    pub player: Bitmap,
    pub player_explosion: [Bitmap; 2],
    pub alien_explosion: Bitmap,
    pub player_shot: Bitmap,
    pub alien_shot: [Bitmap; 2],
    /// Splat left by a shot that hit something.
    pub shot_explosion: Bitmap,
    /// Splat left by a player shot that reached the top untouched.
    pub shot_miss: Bitmap,
    pub shield: Bitmap,
}

lazy_static! {
    pub static ref SPRITES: SpriteSheet = SpriteSheet::decode();
    static ref FONT: HashMap<char, Bitmap> = FONT_ART
        .iter()
        .map(|(ch, rows)| (*ch, Bitmap::from_art(rows)))
        .collect();
}

/// Width of one character cell when drawing text.
pub const GLYPH_ADVANCE: i32 = 8;

/// The 5x7 glyph for `ch`, if the font has one. Lowercase maps to uppercase.
pub fn glyph(ch: char) -> Option<&'static Bitmap> {
    FONT.get(&ch.to_ascii_uppercase())
}

impl SpriteSheet {
    fn decode() -> Self {
        Self {
            squid: [Bitmap::from_art(&SQUID_A), Bitmap::from_art(&SQUID_B)],
            crab: [Bitmap::from_art(&CRAB_A), Bitmap::from_art(&CRAB_B)],
            octopus: [Bitmap::from_art(&OCTOPUS_A), Bitmap::from_art(&OCTOPUS_B)],
            ufo: Bitmap::from_art(&UFO),
            player: Bitmap::from_art(&PLAYER),
            player_explosion: [
                Bitmap::from_art(&PLAYER_EXPLOSION_A),
                Bitmap::from_art(&PLAYER_EXPLOSION_B),
            ],
            alien_explosion: Bitmap::from_art(&ALIEN_EXPLOSION),
            player_shot: Bitmap::from_art(&PLAYER_SHOT),
            alien_shot: [
                Bitmap::from_art(&ALIEN_SHOT_A),
                Bitmap::from_art(&ALIEN_SHOT_B),
            ],
            shot_explosion: Bitmap::from_art(&SHOT_EXPLOSION),
            shot_miss: Bitmap::from_art(&SHOT_MISS),
            shield: Bitmap::from_art(&SHIELD),
        }
    }
}

const SQUID_A: [&str; 8] = [
    "...##...",
    "..####..",
    ".######.",
    "##.##.##",
    "########",
    "..#..#..",
    ".#.##.#.",
    "#.#..#.#",
];

const SQUID_B: [&str; 8] = [
    "...##...",
    "..####..",
    ".######.",
    "##.##.##",
    "########",
    ".#.##.#.",
    "#......#",
    ".#....#.",
];

const CRAB_A: [&str; 8] = [
    "..#.....#..",
    "...#...#...",
    "..#######..",
    ".##.###.##.",
    "###########",
    "#.#######.#",
    "#.#.....#.#",
    "...##.##...",
];

const CRAB_B: [&str; 8] = [
    "..#.....#..",
    "#..#...#..#",
    "#.#######.#",
    "###.###.###",
    "###########",
    ".#########.",
    "..#.....#..",
    ".#.......#.",
];

const OCTOPUS_A: [&str; 8] = [
    "....####....",
    ".##########.",
    "############",
    "###..##..###",
    "############",
    "...##..##...",
    "..##.##.##..",
    "##........##",
];

const OCTOPUS_B: [&str; 8] = [
    "....####....",
    ".##########.",
    "############",
    "###..##..###",
    "############",
    "..###..###..",
    ".##..##..##.",
    "..##....##..",
];

const UFO: [&str; 7] = [
    ".....######.....",
    "...##########...",
    "..############..",
    ".##.##.##.##.##.",
    "################",
    "..###..##..###..",
    "...#........#...",
];

const PLAYER: [&str; 8] = [
    "......#......",
    ".....###.....",
    ".....###.....",
    ".###########.",
    "#############",
    "#############",
    "#############",
    "#############",
];

const PLAYER_EXPLOSION_A: [&str; 8] = [
    ".....#..........",
    "..........#.....",
    ".....#.#........",
    ".#...#..........",
    "...#.##.#.......",
    "..######...#....",
    ".##########.#...",
    "#############.#.",
];

const PLAYER_EXPLOSION_B: [&str; 8] = [
    "#.......#.......",
    "....#.......#...",
    ".#.....#........",
    ".......##.#....#",
    "..#..#..........",
    "#..#.##..#......",
    "..#######..#....",
    ".###########.#..",
];

const ALIEN_EXPLOSION: [&str; 8] = [
    "....#...#....",
    ".#...#.#...#.",
    "..#.......#..",
    "...#.....#...",
    "##.........##",
    "...#.....#...",
    "..#..#.#..#..",
    ".#..#...#..#.",
];

const PLAYER_SHOT: [&str; 4] = ["#", "#", "#", "#"];

const ALIEN_SHOT_A: [&str; 7] = [".#.", "#..", ".#.", "..#", ".#.", "#..", ".#."];

const ALIEN_SHOT_B: [&str; 7] = [".#.", "..#", ".#.", "#..", ".#.", "..#", ".#."];

const SHOT_EXPLOSION: [&str; 8] = [
    "#...#..#",
    "..#...#.",
    ".######.",
    "########",
    ".######.",
    "..#..#..",
    ".#..#..#",
    "#...#...",
];

const SHOT_MISS: [&str; 8] = [
    "#..#...#",
    "...#.#..",
    ".######.",
    "#.####..",
    "..####.#",
    ".######.",
    "#..#.#..",
    "...#..#.",
];

const SHIELD: [&str; 16] = [
    "....################....",
    "...##################...",
    "..####################..",
    ".######################.",
    "########################",
    "########################",
    "########################",
    "########################",
    "########################",
    "########################",
    "########################",
    "########################",
    "#######..........#######",
    "######............######",
    "#####..............#####",
    "#####..............#####",
];

const FONT_ART: [(char, [&str; 7]); 42] = [
    ('A', [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('B', ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."]),
    ('C', [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."]),
    ('D', ["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."]),
    ('E', ["#####", "#....", "#....", "####.", "#....", "#....", "#####"]),
    ('F', ["#####", "#....", "#....", "####.", "#....", "#....", "#...."]),
    ('G', [".###.", "#...#", "#....", "#.###", "#...#", "#...#", ".####"]),
    ('H', ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('I', [".###.", "..#..", "..#..", "..#..", "..#..", "..#..", ".###."]),
    ('J', ["..###", "...#.", "...#.", "...#.", "...#.", "#..#.", ".##.."]),
    ('K', ["#...#", "#..#.", "#.#..", "##...", "#.#..", "#..#.", "#...#"]),
    ('L', ["#....", "#....", "#....", "#....", "#....", "#....", "#####"]),
    ('M', ["#...#", "##.##", "#.#.#", "#.#.#", "#...#", "#...#", "#...#"]),
    ('N', ["#...#", "#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#"]),
    ('O', [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."]),
    ('P', ["####.", "#...#", "#...#", "####.", "#....", "#....", "#...."]),
    ('Q', [".###.", "#...#", "#...#", "#...#", "#.#.#", "#..#.", ".##.#"]),
    ('R', ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"]),
    ('S', [".####", "#....", "#....", ".###.", "....#", "....#", "####."]),
    ('T', ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."]),
    ('U', ["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."]),
    ('V', ["#...#", "#...#", "#...#", "#...#", "#...#", ".#.#.", "..#.."]),
    ('W', ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "#.#.#", ".#.#."]),
    ('X', ["#...#", "#...#", ".#.#.", "..#..", ".#.#.", "#...#", "#...#"]),
    ('Y', ["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", "..#.."]),
    ('Z', ["#####", "....#", "...#.", "..#..", ".#...", "#....", "#####"]),
    ('0', [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."]),
    ('1', ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."]),
    ('2', [".###.", "#...#", "....#", "..##.", ".#...", "#....", "#####"]),
    ('3', ["#####", "....#", "...#.", "..##.", "....#", "#...#", ".###."]),
    ('4', ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."]),
    ('5', ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."]),
    ('6', ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."]),
    ('7', ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."]),
    ('8', [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."]),
    ('9', [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."]),
    ('<', ["...#.", "..#..", ".#...", "#....", ".#...", "..#..", "...#."]),
    ('>', [".#...", "..#..", "...#.", "....#", "...#.", "..#..", ".#..."]),
    ('-', [".....", ".....", ".....", "#####", ".....", ".....", "....."]),
    ('=', [".....", ".....", "#####", ".....", "#####", ".....", "....."]),
    ('*', [".....", "#.#.#", ".###.", "#####", ".###.", "#.#.#", "....."]),
    ('?', [".###.", "#...#", "....#", "...#.", "..#..", ".....", "..#.."]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alien_frames_share_a_footprint() {
        for frames in [&SPRITES.squid, &SPRITES.crab, &SPRITES.octopus] {
            assert_eq!(frames[0].width(), frames[1].width());
            assert_eq!(frames[0].height(), 8);
        }
    }

    #[test]
    fn shield_footprint_is_24_by_16() {
        assert_eq!(SPRITES.shield.width(), 24);
        assert_eq!(SPRITES.shield.height(), 16);
    }

    #[test]
    fn font_covers_hud_text() {
        for ch in "SCORE<1> HI-SCORE SCORE<2> CREDIT GAME OVER 0123456789".chars() {
            if ch != ' ' {
                assert!(glyph(ch).is_some(), "missing glyph {ch:?}");
            }
        }
        assert!(glyph('a').is_some());
        assert!(glyph('~').is_none());
    }
}

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File magic of a saved leaderboard.
pub const MAGIC: [u8; 4] = *b"SILB";
pub const VERSION: u8 = 1;
/// Entries kept after a new score is recorded.
pub const MAX_ENTRIES: usize = 10;
/// Name shown when there is no saved board, and used for unnamed scores.
pub const PLACEHOLDER_NAME: &str = "AAA";
pub const MAX_NAME_LEN: usize = 3;

#[derive(Debug)]
pub enum LeaderboardError {
    Io(io::Error),
    InvalidMagic { found: [u8; 4] },
    UnsupportedVersion { found: u8 },
    Truncated { needed: usize, remaining: usize },
    TrailingBytes { count: usize },
    InvalidName { name: String },
    TooManyEntries { count: usize },
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "leaderboard i/o failed: {e}"),
            Self::InvalidMagic { found } => write!(f, "invalid leaderboard magic: {found:02x?}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported leaderboard version: {found}")
            }
            Self::Truncated { needed, remaining } => write!(
                f,
                "leaderboard truncated: needed {needed} more bytes, {remaining} left"
            ),
            Self::TrailingBytes { count } => {
                write!(f, "leaderboard has {count} unexpected trailing bytes")
            }
            Self::InvalidName { name } => write!(
                f,
                "invalid leaderboard name {name:?}: expected 1-3 uppercase letters or digits"
            ),
            Self::TooManyEntries { count } => {
                write!(f, "too many leaderboard entries to save: {count}")
            }
        }
    }
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LeaderboardError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// One line of the board: a three character code and a score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub score: u32,
}

impl Entry {
    pub fn new(name: &str, score: u32) -> Result<Self, LeaderboardError> {
        if !is_valid_name(name) {
            return Err(LeaderboardError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            score,
        })
    }
}

pub fn is_valid_name(name: &str) -> bool {
    (1..=MAX_NAME_LEN).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// The board shown before anyone has played.
pub fn placeholder() -> Vec<Entry> {
    vec![Entry {
        name: PLACEHOLDER_NAME.to_string(),
        score: 0,
    }]
}

pub fn best_score(entries: &[Entry]) -> u32 {
    entries.iter().map(|e| e.score).max().unwrap_or(0)
}

/// Highest score first. Equal scores keep their relative order.
pub fn sort(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Add `entry` and keep only the best `MAX_ENTRIES`. A new score ranks below
/// existing equal scores.
pub fn record(entries: &mut Vec<Entry>, entry: Entry) {
    entries.push(entry);
    sort(entries);
    entries.truncate(MAX_ENTRIES);
}

/// Would `score` earn a place on the board?
pub fn qualifies(entries: &[Entry], score: u32) -> bool {
    score > 0 && (entries.len() < MAX_ENTRIES || entries.iter().any(|e| score > e.score))
}

/// Where the leaderboard lives between runs.
pub trait ScoreStore {
    /// Entries sorted best first. A store that has never been saved yields
    /// the placeholder board.
    fn load(&self) -> Result<Vec<Entry>, LeaderboardError>;
    /// Replace whatever was stored.
    fn save(&self, entries: &[Entry]) -> Result<(), LeaderboardError>;
}

/// A leaderboard kept in a single file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Vec<Entry>, LeaderboardError> {
        match fs::read(&self.path) {
            Ok(bytes) => decode(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No leaderboard at {}, using placeholder", self.path.display());
                Ok(placeholder())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &[Entry]) -> Result<(), LeaderboardError> {
        let bytes = encode(entries)?;
        fs::write(&self.path, bytes)?;
        log::debug!(
            "Saved {} leaderboard entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Serialize `entries` in their current order.
///
/// Layout, little-endian: magic, `u8` version, `u16` count, then per entry a
/// `u8` name length, the ASCII name and a `u32` score.
pub fn encode(entries: &[Entry]) -> Result<Vec<u8>, LeaderboardError> {
    let count = u16::try_from(entries.len()).map_err(|_| LeaderboardError::TooManyEntries {
        count: entries.len(),
    })?;

    let mut bytes = Vec::with_capacity(7 + entries.len() * (1 + MAX_NAME_LEN + 4));
    bytes.extend_from_slice(&MAGIC);
    bytes.push(VERSION);
    bytes.extend_from_slice(&count.to_le_bytes());
    for entry in entries {
        if !is_valid_name(&entry.name) {
            return Err(LeaderboardError::InvalidName {
                name: entry.name.clone(),
            });
        }
        bytes.push(entry.name.len() as u8);
        bytes.extend_from_slice(entry.name.as_bytes());
        bytes.extend_from_slice(&entry.score.to_le_bytes());
    }
    Ok(bytes)
}

/// Parse a saved board and return it best first.
pub fn decode(bytes: &[u8]) -> Result<Vec<Entry>, LeaderboardError> {
    let mut reader = Reader { bytes };

    let magic = reader.array::<4>()?;
    if magic != MAGIC {
        return Err(LeaderboardError::InvalidMagic { found: magic });
    }
    let [version] = reader.array::<1>()?;
    if version != VERSION {
        return Err(LeaderboardError::UnsupportedVersion { found: version });
    }
    let count = u16::from_le_bytes(reader.array::<2>()?);

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let [len] = reader.array::<1>()?;
        let raw = reader.take(len as usize)?;
        let name = String::from_utf8_lossy(raw).into_owned();
        let score = u32::from_le_bytes(reader.array::<4>()?);
        entries.push(Entry::new(&name, score)?);
    }
    if !reader.bytes.is_empty() {
        return Err(LeaderboardError::TrailingBytes {
            count: reader.bytes.len(),
        });
    }

    sort(&mut entries);
    Ok(entries)
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], LeaderboardError> {
        if self.bytes.len() < n {
            return Err(LeaderboardError::Truncated {
                needed: n,
                remaining: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], LeaderboardError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

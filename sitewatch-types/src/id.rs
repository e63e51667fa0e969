//! Opaque identifiers assigned by the monitor store.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

/// An identifier as handed out by the store.
///
/// Stores use either integer keys or string keys (UUIDs, slugs). The
/// original representation is kept so that an id serializes back exactly as
/// it was received.
///
/// Ids compare by value, not by representation: the text id `"12"` and the
/// numeric id `12` are the same id, so an id typed on the command line
/// matches whatever form the store used. Ids are totally ordered: numeric
/// ids compare numerically, text ids lexicographically, and every numeric id
/// sorts before every text id.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Id {
    /// Integer key.
    Num(u64),
    /// Any other key.
    Text(String),
}

impl Id {
    /// Returns the numeric value if this is an integer key, or text in
    /// canonical decimal form.
    pub fn as_u64(&self) -> Option<u64> {
        match self.key() {
            Key::Num(n) => Some(n),
            Key::Text(_) => None,
        }
    }
}

/// Comparison form of an id.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Key<'a> {
    Num(u64),
    Text(&'a str),
}

impl Id {
    // Text in canonical decimal form ("12", not "012" or "+12") is numeric
    fn key(&self) -> Key<'_> {
        match self {
            Id::Num(n) => Key::Num(*n),
            Id::Text(s) => match canonical_u64(s) {
                Some(n) => Key::Num(n),
                None => Key::Text(s),
            },
        }
    }
}

fn canonical_u64(s: &str) -> Option<u64> {
    let n: u64 = s.parse().ok()?;
    (n.to_string() == s).then_some(n)
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for Id {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Id::from(s))
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Num(n)
    }
}

/// Digit-only input becomes a numeric id, anything else a text id.
impl From<&str> for Id {
    fn from(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Id::Num(n),
            Err(_) => Id::Text(s.to_string()),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::from(s.as_str())
    }
}

/// Identifier of a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MonitorId(pub Id);

/// Identifier of a [`HealthRecord`](crate::HealthRecord).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RecordId(pub Id);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Id> for MonitorId {
    fn from(id: Id) -> Self {
        MonitorId(id)
    }
}

impl From<u64> for MonitorId {
    fn from(n: u64) -> Self {
        MonitorId(Id::Num(n))
    }
}

impl From<&str> for MonitorId {
    fn from(s: &str) -> Self {
        MonitorId(Id::from(s))
    }
}

impl From<Id> for RecordId {
    fn from(id: Id) -> Self {
        RecordId(id)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId(Id::Num(n))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(Id::from(s))
    }
}

impl FromStr for MonitorId {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MonitorId(s.into()))
    }
}

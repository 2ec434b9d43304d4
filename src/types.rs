use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::{PLANNED_MARKER, SOUTH_PREFIX};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Form parameters the upstream page filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    pub strait: &'static str,
    pub direction: &'static str,
    pub movement: &'static str,
}

impl FilterParams {
    /// Form body fields, including the constant submission flag.
    pub fn form_fields(&self) -> [(&'static str, &'static str); 4] {
        [
            ("Strait", self.strait),
            ("Direction", self.direction),
            ("Movement", self.movement),
            ("submitted", "1"),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub name: &'static str,
    pub params: FilterParams,
}

impl FilterSpec {
    /// Stats bucket this filter feeds, resolved from its name.
    pub fn bucket(&self) -> (Direction, Status) {
        let direction = if self.name.starts_with(SOUTH_PREFIX) {
            Direction::South
        } else {
            Direction::North
        };
        let status = if self.name.contains(PLANNED_MARKER) {
            Status::Planned
        } else {
            Status::Ready
        };
        (direction, status)
    }
}

/// Where the ship enters the strait from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Entering from the south, heading north.
    South,
    /// Entering from the north, heading south.
    North,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::South => write!(f, "south"),
            Direction::North => write!(f, "north"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Transit scheduled but the ship is not yet cleared.
    Planned,
    /// Cleared and waiting to enter.
    Ready,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Planned => write!(f, "planned"),
            Status::Ready => write!(f, "ready"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scraped rows
// ---------------------------------------------------------------------------

/// Text of each `<td>` in one table row, tags stripped.
pub type RawRow = Vec<String>;

/// One vessel transit as listed by the upstream table.
/// Serialized with the field names the dashboard frontend reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShipRecord {
    #[serde(rename = "planlama")]
    pub scheduling_label: String,
    #[serde(rename = "gemiAdi")]
    pub ship_name: String,
    /// Metres. NaN when the source cell is not numeric; serializes as null.
    #[serde(rename = "boy")]
    pub length: f64,
    #[serde(rename = "gemiTipi")]
    pub ship_type: String,
    #[serde(rename = "kilavuz")]
    pub has_pilot: bool,
    #[serde(rename = "romorkor")]
    pub has_tug: bool,
    #[serde(rename = "sp2")]
    pub aux_field2: String,
    #[serde(rename = "sp1")]
    pub aux_field1: String,
}

// ---------------------------------------------------------------------------
// Per-filter results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterResult {
    Ships(Vec<ShipRecord>),
    Failed { error: String },
}

impl FilterResult {
    pub fn ships(&self) -> Option<&[ShipRecord]> {
        match self {
            FilterResult::Ships(ships) => Some(ships),
            FilterResult::Failed { .. } => None,
        }
    }
}

/// Results keyed by filter name, kept in filter-table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsByFilter {
    entries: Vec<(&'static str, FilterResult)>,
}

impl ResultsByFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the result for `name`.
    pub fn insert(&mut self, name: &'static str, result: FilterResult) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = result,
            None => self.entries.push((name, result)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FilterResult> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FilterResult)> {
        self.entries.iter().map(|(n, r)| (*n, r))
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, r)| matches!(r, FilterResult::Failed { .. }))
            .count()
    }
}

impl FromIterator<(&'static str, FilterResult)> for ResultsByFilter {
    fn from_iter<I: IntoIterator<Item = (&'static str, FilterResult)>>(iter: I) -> Self {
        let mut results = Self::new();
        for (name, result) in iter {
            results.insert(name, result);
        }
        results
    }
}

impl Serialize for ResultsByFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, result) in &self.entries {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Dashboard stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub total: usize,
    #[serde(rename = "kilavuzlu")]
    pub with_pilot: usize,
    #[serde(rename = "kilavuzsuz")]
    pub without_pilot: usize,
    #[serde(rename = "gunduzcu")]
    pub daytime_only: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionStats {
    #[serde(rename = "planli")]
    pub planned: BucketStats,
    #[serde(rename = "hazir")]
    pub ready: BucketStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    #[serde(rename = "guney")]
    pub south: DirectionStats,
    #[serde(rename = "kuzey")]
    pub north: DirectionStats,
}

impl DashboardStats {
    pub fn bucket(&self, direction: Direction, status: Status) -> &BucketStats {
        let dir = match direction {
            Direction::South => &self.south,
            Direction::North => &self.north,
        };
        match status {
            Status::Planned => &dir.planned,
            Status::Ready => &dir.ready,
        }
    }

    pub fn bucket_mut(&mut self, direction: Direction, status: Status) -> &mut BucketStats {
        let dir = match direction {
            Direction::South => &mut self.south,
            Direction::North => &mut self.north,
        };
        match status {
            Status::Planned => &mut dir.planned,
            Status::Ready => &mut dir.ready,
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub stats: DashboardStats,
    pub detailed_data: ResultsByFilter,
    /// Istanbul local time, `dd.MM.yyyy HH:mm`.
    pub last_update: String,
}

//! Sort strategy registry.
//!
//! Maps the caller's sort token onto a concrete ordering rule. Every rule in
//! this service is descending (newest / most popular first) and ends in the
//! record id so that the resulting order is strict and total.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use crate::models::MediaRecord;

/// Named ordering rule applied to a listing request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Newest first. Ids are assigned in creation order.
    #[default]
    Recency,
    /// Most viewed first, ties broken by higher id.
    Views,
    /// Most liked first, ties broken by higher id.
    Likes,
}

impl SortStrategy {
    /// Resolve a caller supplied sort token.
    ///
    /// Matching is case-insensitive. `"hits"` selects [`SortStrategy::Views`]
    /// and `"likes"` selects [`SortStrategy::Likes`]; anything else, including
    /// a missing token, falls back to [`SortStrategy::Recency`]. The fallback
    /// is long-standing client-facing behavior and must not become an error.
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(raw) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return SortStrategy::Recency;
        };

        match Self::from_tag(&raw.to_ascii_lowercase()) {
            Some(strategy) => strategy,
            None => {
                debug!(sort_token = raw, "unrecognized sort token, using recency");
                SortStrategy::Recency
            }
        }
    }

    /// Strict lookup of a canonical (already lowercase) token.
    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "recency" => Some(SortStrategy::Recency),
            "hits" => Some(SortStrategy::Views),
            "likes" => Some(SortStrategy::Likes),
            _ => None,
        }
    }

    /// Canonical token, also used as the cursor tag and metrics label.
    pub fn token(&self) -> &'static str {
        match self {
            SortStrategy::Recency => "recency",
            SortStrategy::Views => "hits",
            SortStrategy::Likes => "likes",
        }
    }

    pub fn order_spec(&self) -> OrderSpec {
        match self {
            SortStrategy::Recency => OrderSpec {
                primary: SortField::Id,
                direction: Direction::Descending,
                tie_break: None,
            },
            SortStrategy::Views => OrderSpec {
                primary: SortField::ViewCount,
                direction: Direction::Descending,
                tie_break: Some(SortField::Id),
            },
            SortStrategy::Likes => OrderSpec {
                primary: SortField::LikeCount,
                direction: Direction::Descending,
                tie_break: Some(SortField::Id),
            },
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Record field an ordering can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    ViewCount,
    LikeCount,
}

impl SortField {
    pub fn value(&self, record: &MediaRecord) -> i64 {
        match self {
            SortField::Id => record.id,
            SortField::ViewCount => record.view_count,
            SortField::LikeCount => record.like_count,
        }
    }

    /// Column name in the `videos` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::ViewCount => "view_count",
            SortField::LikeCount => "like_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Position of a record under an [`OrderSpec`].
///
/// Without a tie-break field both components hold the primary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub primary: i64,
    pub tie_break: i64,
}

/// Ordering rule handed to the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderSpec {
    pub primary: SortField,
    pub direction: Direction,
    pub tie_break: Option<SortField>,
}

impl OrderSpec {
    pub fn key_of(&self, record: &MediaRecord) -> SortKey {
        let primary = self.primary.value(record);
        SortKey {
            primary,
            tie_break: self.tie_break.map_or(primary, |field| field.value(record)),
        }
    }

    /// Rank order of two keys: `Less` means `a` is returned before `b`.
    pub fn compare(&self, a: &SortKey, b: &SortKey) -> Ordering {
        let natural = (a.primary, a.tie_break).cmp(&(b.primary, b.tie_break));
        match self.direction {
            Direction::Ascending => natural,
            Direction::Descending => natural.reverse(),
        }
    }

    pub fn compare_records(&self, a: &MediaRecord, b: &MediaRecord) -> Ordering {
        self.compare(&self.key_of(a), &self.key_of(b))
    }

    /// Whether `key` ranks strictly after the exclusive `boundary`.
    pub fn is_after(&self, key: &SortKey, boundary: &SortKey) -> bool {
        self.compare(key, boundary) == Ordering::Greater
    }
}

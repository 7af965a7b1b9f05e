//! Continuation cursor codec.
//!
//! A cursor names the last record of the previous page in the terms of the
//! strategy that produced it. Recency cursors carry the id only; count
//! cursors carry `(count, id)` because the count alone cannot separate
//! records with equal counts.
//!
//! Wire format: URL-safe base64 (no padding) of `recency:<id>`,
//! `hits:<count>:<id>` or `likes:<count>:<id>`. Clients treat it as opaque.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Serialize, Serializer};
use std::fmt;

use super::strategy::{SortKey, SortStrategy};
use crate::error::{CatalogError, Result};
use crate::models::MediaRecord;

/// Strategy-scoped continuation point.
///
/// Built with [`Cursor::after`] or [`Cursor::decode`]; a `Count` cursor
/// always carries `Views` or `Likes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    Recency {
        id: i64,
    },
    Count {
        strategy: SortStrategy,
        count: i64,
        id: i64,
    },
}

impl Cursor {
    /// Cursor pointing just past `last` under `strategy`.
    pub fn after(last: &MediaRecord, strategy: SortStrategy) -> Self {
        match strategy {
            SortStrategy::Recency => Cursor::Recency { id: last.id },
            SortStrategy::Views | SortStrategy::Likes => {
                let key = strategy.order_spec().key_of(last);
                Cursor::Count {
                    strategy,
                    count: key.primary,
                    id: key.tie_break,
                }
            }
        }
    }

    /// Exclusive lower bound for the next fetch.
    pub fn boundary(&self) -> SortKey {
        match *self {
            Cursor::Recency { id } => SortKey {
                primary: id,
                tie_break: id,
            },
            Cursor::Count { count, id, .. } => SortKey {
                primary: count,
                tie_break: id,
            },
        }
    }

    /// Opaque token handed to clients.
    pub fn token(&self) -> String {
        let raw = match *self {
            Cursor::Recency { id } => format!("{}:{}", SortStrategy::Recency.token(), id),
            Cursor::Count {
                strategy,
                count,
                id,
            } => format!("{}:{}:{}", strategy.token(), count, id),
        };
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decode a client token under the strategy resolved for this request.
    ///
    /// Tokens issued under another strategy are rejected rather than
    /// reinterpreted or silently restarted from the top.
    pub fn decode(token: &str, strategy: SortStrategy) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| malformed(format!("invalid encoding: {}", e)))?;
        let raw = String::from_utf8(bytes).map_err(|_| malformed("cursor is not valid UTF-8"))?;

        let mut parts = raw.split(':');
        let tag = parts.next().unwrap_or_default();
        let issued_for =
            SortStrategy::from_tag(tag).ok_or_else(|| malformed("unknown cursor format"))?;
        if issued_for != strategy {
            return Err(malformed(format!(
                "cursor was issued for '{}' ordering, request uses '{}'",
                issued_for, strategy
            )));
        }

        let fields = parts.map(parse_field).collect::<Result<Vec<i64>>>()?;
        match (strategy, fields.as_slice()) {
            (SortStrategy::Recency, &[id]) => Ok(Cursor::Recency { id }),
            (SortStrategy::Views | SortStrategy::Likes, &[count, id]) => Ok(Cursor::Count {
                strategy,
                count,
                id,
            }),
            _ => Err(malformed(format!(
                "unexpected field count {} for '{}' cursor",
                fields.len(),
                strategy
            ))),
        }
    }
}

fn parse_field(field: &str) -> Result<i64> {
    let value = field
        .parse::<i64>()
        .map_err(|e| malformed(format!("invalid value '{}': {}", field, e)))?;
    if value < 0 {
        return Err(malformed(format!("negative value {}", value)));
    }
    Ok(value)
}

fn malformed(msg: impl Into<String>) -> CatalogError {
    CatalogError::MalformedCursor(msg.into())
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

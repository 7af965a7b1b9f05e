//! Keyword and owner predicates applied before ordering.

use crate::models::MediaRecord;

/// Case-insensitive substring match on title or description.
///
/// A missing or blank query is a no-op filter that matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    term: Option<String>,
}

impl KeywordFilter {
    /// Surrounding whitespace is trimmed before matching, so `" 992"`
    /// searches for `"992"`.
    pub fn new(query: Option<&str>) -> Self {
        let term = query.map(str::trim).filter(|q| !q.is_empty()).map(fold);
        Self { term }
    }

    /// Lowercased search term, if the filter is active.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn matches(&self, record: &MediaRecord) -> bool {
        match &self.term {
            None => true,
            Some(term) => {
                fold(&record.title).contains(term.as_str())
                    || fold(&record.description).contains(term.as_str())
            }
        }
    }
}

// Per-character lowercasing. `str::to_lowercase` picks a final sigma from
// context, which would make "ΟΣ" miss inside "ΟΣΑ".
fn fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Predicate handed to the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub keyword: KeywordFilter,
    /// Restrict to records uploaded by this member.
    pub owner_id: Option<i64>,
    /// Restrict to records this member has liked. The like relation lives
    /// in the store, so [`RecordFilter::matches`] does not check it.
    pub liked_by: Option<i64>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn keyword(query: Option<&str>) -> Self {
        Self {
            keyword: KeywordFilter::new(query),
            ..Self::default()
        }
    }

    pub fn owner(owner_id: i64) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    pub fn liked_by(member_id: i64) -> Self {
        Self {
            liked_by: Some(member_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &MediaRecord) -> bool {
        self.owner_id.map_or(true, |owner| record.owner_id == owner)
            && self.keyword.matches(record)
    }
}

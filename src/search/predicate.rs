//! Composable predicates over catalog tracks.
//!
//! A [`TrackPredicate`] is a conjunction of [`Clause`]s. It is evaluated
//! in-process with [`TrackPredicate::matches`] and rendered by the storage
//! layer for push-down, so both paths must agree on the semantics of every
//! clause: containment is an exact, case-sensitive substring match and year
//! equality compares canonical text.

use crate::catalog_store::Track;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Optional search criteria as supplied by a caller.
///
/// Missing and empty values both mean "no constraint".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TrackFilter {
    pub title_contains: Option<String>,
    pub artist_contains: Option<String>,
    pub year_equals: Option<String>,
}

impl TrackFilter {
    pub fn is_empty(&self) -> bool {
        [&self.title_contains, &self.artist_contains, &self.year_equals]
            .iter()
            .all(|c| non_empty(c).is_none())
    }
}

fn non_empty(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|s| !s.is_empty())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackField {
    Title,
    Artist,
    Year,
}

impl TrackField {
    /// Column holding the field in the catalog table.
    pub fn column(&self) -> &'static str {
        match self {
            TrackField::Title => "title",
            TrackField::Artist => "artist",
            TrackField::Year => "year",
        }
    }

    fn text_of(&self, track: &Track) -> String {
        match self {
            TrackField::Title => track.title.clone(),
            TrackField::Artist => track.artist.clone(),
            TrackField::Year => track.year.as_text(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Clause {
    Contains { field: TrackField, needle: String },
    Equals { field: TrackField, value: String },
    IdIn(BTreeSet<String>),
}

impl Clause {
    pub fn matches(&self, track: &Track) -> bool {
        match self {
            Clause::Contains { field, needle } => field.text_of(track).contains(needle.as_str()),
            Clause::Equals { field, value } => field.text_of(track) == *value,
            Clause::IdIn(ids) => ids.contains(&track.id),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackPredicate {
    clauses: Vec<Clause>,
}

impl TrackPredicate {
    /// The predicate with no clauses, accepting every track.
    pub fn accept_all() -> Self {
        TrackPredicate::default()
    }

    pub fn from_filter(filter: &TrackFilter) -> Self {
        let mut predicate = TrackPredicate::accept_all();
        if let Some(needle) = non_empty(&filter.title_contains) {
            predicate = predicate.and(Clause::Contains {
                field: TrackField::Title,
                needle: needle.to_string(),
            });
        }
        if let Some(needle) = non_empty(&filter.artist_contains) {
            predicate = predicate.and(Clause::Contains {
                field: TrackField::Artist,
                needle: needle.to_string(),
            });
        }
        if let Some(value) = non_empty(&filter.year_equals) {
            predicate = predicate.and(Clause::Equals {
                field: TrackField::Year,
                value: value.to_string(),
            });
        }
        predicate
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Restricts the predicate to tracks whose id is in `ids`.
    pub fn and_id_in(self, ids: BTreeSet<String>) -> Self {
        self.and(Clause::IdIn(ids))
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_accept_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, track: &Track) -> bool {
        self.clauses.iter().all(|clause| clause.matches(track))
    }
}

impl From<&TrackFilter> for TrackPredicate {
    fn from(filter: &TrackFilter) -> Self {
        TrackPredicate::from_filter(filter)
    }
}

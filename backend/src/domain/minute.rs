//! Governance minutes and their ordering rules.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AssociationId, MinuteId, User, UserId};

/// Validation errors raised by minute value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MinuteValidationError {
    /// Content was blank.
    #[error("minute content must not be empty")]
    EmptyContent,
    /// Sort field outside the declared set.
    #[error("sort must be one of content, date, association, voters; got {0:?}")]
    UnknownSortField(String),
    /// Sort order outside the declared set.
    #[error("order must be ASC or DESC; got {0:?}")]
    UnknownSortOrder(String),
}

/// Free-text body of a minute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "Motion to raise the membership fee was accepted.")]
pub struct MinuteContent(String);

impl MinuteContent {
    /// Validate minute content.
    pub fn new(raw: impl Into<String>) -> Result<Self, MinuteValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(MinuteValidationError::EmptyContent);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for MinuteContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Fields required to store a minute with an already-resolved voter roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMinute {
    /// Owning association.
    pub association_id: AssociationId,
    /// Body text.
    pub content: MinuteContent,
    /// Meeting date.
    pub date: NaiveDate,
    /// Voter ids, each resolved to an existing user.
    pub voter_ids: Vec<UserId>,
}

/// Minute with its voter roster resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Minute {
    id: MinuteId,
    association_id: AssociationId,
    content: MinuteContent,
    #[schema(value_type = String, format = Date, example = "2021-03-01")]
    date: NaiveDate,
    voters: Vec<User>,
}

impl Minute {
    /// Assemble a stored minute.
    #[must_use]
    pub fn from_parts(id: MinuteId, fields: NewMinute, voters: Vec<User>) -> Self {
        Self {
            id,
            association_id: fields.association_id,
            content: fields.content,
            date: fields.date,
            voters,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> MinuteId {
        self.id
    }

    /// Owning association.
    #[must_use]
    pub const fn association_id(&self) -> AssociationId {
        self.association_id
    }

    /// Body text.
    #[must_use]
    pub const fn content(&self) -> &MinuteContent {
        &self.content
    }

    /// Meeting date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Voters recorded at creation or last edit.
    #[must_use]
    pub fn voters(&self) -> &[User] {
        &self.voters
    }

    /// Stored fields, with voters reduced to ids.
    #[must_use]
    pub fn to_fields(&self) -> NewMinute {
        NewMinute {
            association_id: self.association_id,
            content: self.content.clone(),
            date: self.date,
            voter_ids: self.voters.iter().map(User::id).collect(),
        }
    }
}

/// Partial edit of a minute; references are checked by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinuteChanges {
    /// Replacement body.
    pub content: Option<MinuteContent>,
    /// Replacement date.
    pub date: Option<NaiveDate>,
    /// Move to another association.
    pub association_id: Option<AssociationId>,
    /// Replacement voter roster.
    pub voter_ids: Option<Vec<UserId>>,
}

/// Field a minute listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MinuteSortField {
    /// Body text, lexicographic.
    Content,
    /// Meeting date.
    #[default]
    Date,
    /// Owning association id.
    Association,
    /// Number of voters.
    Voters,
}

/// Direction of a minute listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl FromStr for MinuteSortField {
    type Err = MinuteValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "content" => Ok(Self::Content),
            "date" => Ok(Self::Date),
            "association" => Ok(Self::Association),
            "voters" => Ok(Self::Voters),
            other => Err(MinuteValidationError::UnknownSortField(other.to_owned())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = MinuteValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(MinuteValidationError::UnknownSortOrder(raw.to_owned()))
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

type MinuteComparator = fn(&Minute, &Minute) -> Ordering;

fn by_content(a: &Minute, b: &Minute) -> Ordering {
    a.content.cmp(&b.content)
}

fn by_date(a: &Minute, b: &Minute) -> Ordering {
    a.date.cmp(&b.date)
}

fn by_association(a: &Minute, b: &Minute) -> Ordering {
    a.association_id.cmp(&b.association_id)
}

fn by_voter_count(a: &Minute, b: &Minute) -> Ordering {
    a.voters.len().cmp(&b.voters.len())
}

impl MinuteSortField {
    const fn comparator(self) -> MinuteComparator {
        match self {
            Self::Content => by_content,
            Self::Date => by_date,
            Self::Association => by_association,
            Self::Voters => by_voter_count,
        }
    }
}

/// Ordering applied to a minute listing. Defaults to date, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinuteOrdering {
    /// Sort key.
    pub field: MinuteSortField,
    /// Direction.
    pub order: SortOrder,
}

impl MinuteOrdering {
    /// Build an ordering.
    #[must_use]
    pub const fn new(field: MinuteSortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Compare two minutes; ties fall back to the minute id in the same direction.
    #[must_use]
    pub fn compare(&self, a: &Minute, b: &Minute) -> Ordering {
        let ordering = (self.field.comparator())(a, b).then_with(|| a.id.cmp(&b.id));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Sort `minutes` in place.
    pub fn sort(&self, minutes: &mut [Minute]) {
        minutes.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{association_id, minute, user};
    use rstest::rstest;

    fn ids(minutes: &[Minute]) -> Vec<i32> {
        minutes.iter().map(|m| m.id().get()).collect()
    }

    #[rstest]
    fn date_ascending_is_chronological() {
        let mut minutes = vec![
            minute(1, 1, "a", "2021-01-01", vec![]),
            minute(2, 1, "b", "2021-03-01", vec![]),
            minute(3, 1, "c", "2021-02-01", vec![]),
        ];
        MinuteOrdering::new(MinuteSortField::Date, SortOrder::Asc).sort(&mut minutes);
        assert_eq!(ids(&minutes), vec![1, 3, 2]);
    }

    #[rstest]
    fn default_ordering_is_newest_first() {
        let mut minutes = vec![
            minute(1, 1, "a", "2021-01-01", vec![]),
            minute(2, 1, "b", "2021-03-01", vec![]),
            minute(3, 1, "c", "2021-02-01", vec![]),
        ];
        MinuteOrdering::default().sort(&mut minutes);
        assert_eq!(ids(&minutes), vec![2, 3, 1]);
    }

    #[rstest]
    fn voters_sort_by_roster_size() {
        let mut minutes = vec![
            minute(1, 1, "a", "2021-01-01", vec![user(7, "a@x.io"), user(8, "b@x.io")]),
            minute(2, 1, "b", "2021-01-01", vec![]),
            minute(3, 1, "c", "2021-01-01", vec![user(7, "a@x.io")]),
        ];
        MinuteOrdering::new(MinuteSortField::Voters, SortOrder::Asc).sort(&mut minutes);
        assert_eq!(ids(&minutes), vec![2, 3, 1]);
    }

    #[rstest]
    fn content_descending_breaks_ties_by_id() {
        let mut minutes = vec![
            minute(1, 1, "same", "2021-01-01", vec![]),
            minute(2, 1, "alpha", "2021-01-01", vec![]),
            minute(3, 1, "same", "2021-01-01", vec![]),
        ];
        MinuteOrdering::new(MinuteSortField::Content, SortOrder::Desc).sort(&mut minutes);
        assert_eq!(ids(&minutes), vec![3, 1, 2]);
    }

    #[rstest]
    fn association_sort_uses_association_id() {
        let mut minutes = vec![
            minute(1, 3, "a", "2021-01-01", vec![]),
            minute(2, 1, "b", "2021-01-01", vec![]),
        ];
        MinuteOrdering::new(MinuteSortField::Association, SortOrder::Asc).sort(&mut minutes);
        assert_eq!(ids(&minutes), vec![2, 1]);
        assert_eq!(minutes.first().map(Minute::association_id), Some(association_id(1)));
    }

    #[rstest]
    #[case("ASC", Some(SortOrder::Asc))]
    #[case("asc", Some(SortOrder::Asc))]
    #[case("Desc", Some(SortOrder::Desc))]
    #[case("sideways", None)]
    fn sort_order_is_case_insensitive(#[case] raw: &str, #[case] expected: Option<SortOrder>) {
        assert_eq!(raw.parse::<SortOrder>().ok(), expected);
    }

    #[rstest]
    #[case("content", Some(MinuteSortField::Content))]
    #[case("date", Some(MinuteSortField::Date))]
    #[case("association", Some(MinuteSortField::Association))]
    #[case("voters", Some(MinuteSortField::Voters))]
    #[case("id; DROP TABLE minutes", None)]
    fn sort_field_is_a_closed_set(#[case] raw: &str, #[case] expected: Option<MinuteSortField>) {
        assert_eq!(raw.parse::<MinuteSortField>().ok(), expected);
    }
}

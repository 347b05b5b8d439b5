use std::{fmt, str::FromStr};

use crate::domain::error::DomainError;

/// Columns of the catalog table that may be used for ordering.
///
/// Only these identifiers ever reach the SQL text of a filter query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Author,
    Country,
    Status,
    Published,
    AverageRating,
    RatingCount,
    Popularity,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Id,
        SortField::Name,
        SortField::Author,
        SortField::Country,
        SortField::Status,
        SortField::Published,
        SortField::AverageRating,
        SortField::RatingCount,
        SortField::Popularity,
    ];

    /// Name of the request parameter value and of the stored column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Author => "author",
            SortField::Country => "country",
            SortField::Status => "status",
            SortField::Published => "published",
            SortField::AverageRating => "averageRating",
            SortField::RatingCount => "ratingCount",
            SortField::Popularity => "popularity",
        }
    }

    /// Quoted column identifier, safe to push into SQL text.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "\"id\"",
            SortField::Name => "\"name\"",
            SortField::Author => "\"author\"",
            SortField::Country => "\"country\"",
            SortField::Status => "\"status\"",
            SortField::Published => "\"published\"",
            SortField::AverageRating => "\"averageRating\"",
            SortField::RatingCount => "\"ratingCount\"",
            SortField::Popularity => "\"popularity\"",
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == trimmed)
            .ok_or_else(|| DomainError::UnknownOrderField(trimmed.to_string()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(DomainError::UnknownOrderSort(trimmed.to_string()))
        }
    }
}

/// Whether a single-manga read was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

impl CacheOutcome {
    /// Value of the `x-cache` response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleOutcome::Added => "added",
            ToggleOutcome::Removed => "removed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_accepts_known_columns() {
        assert_eq!("ratingCount".parse::<SortField>().ok(), Some(SortField::RatingCount));
        assert_eq!(" name ".parse::<SortField>().ok(), Some(SortField::Name));
        assert_eq!(SortField::AverageRating.column(), "\"averageRating\"");
    }

    #[test]
    fn sort_field_rejects_injection_attempts() {
        for candidate in [
            "name\"; DROP TABLE \"User\"; --",
            "name DESC, (SELECT 1)",
            "Name",
            "",
        ] {
            let err = candidate.parse::<SortField>().expect_err("must be rejected");
            assert!(matches!(err, DomainError::UnknownOrderField(_)));
        }
    }

    #[test]
    fn sort_direction_is_case_insensitive() {
        assert_eq!("asc".parse::<SortDirection>().ok(), Some(SortDirection::Asc));
        assert_eq!("DESC".parse::<SortDirection>().ok(), Some(SortDirection::Desc));
        assert!("DESC; --".parse::<SortDirection>().is_err());
    }
}

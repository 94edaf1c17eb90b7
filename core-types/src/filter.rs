//! Filters and sort specifications for catalog queries.
//!
//! The wire renderings match the remote service's query syntax: filters are
//! `field:value` pairs (id lists pipe-separated), sorts are
//! `field:direction`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One filter clause of a catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Restrict results to exactly this id set.
    Id(Vec<i64>),
    /// Substring match on the display name.
    Name(String),
    DateAdded {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    DateLastUpdated {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Id(ids) => {
                let joined = ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join("|");
                write!(f, "id:{joined}")
            }
            Filter::Name(name) => write!(f, "name:{name}"),
            Filter::DateAdded { start, end } => write!(
                f,
                "date_added:{}|{}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
            Filter::DateLastUpdated { start, end } => write!(
                f,
                "date_last_updated:{}|{}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    DateAdded,
    DateLastUpdated,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::DateAdded => "date_added",
            SortField::DateLastUpdated => "date_last_updated",
        }
    }
}

/// Sort specification for a catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.direction.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_filter_rendering() {
        let filter = Filter::Id(vec![1, 2, 3]);
        assert_eq!(filter.to_string(), "id:1|2|3");
    }

    #[test]
    fn test_name_filter_rendering() {
        let filter = Filter::Name("spider".to_string());
        assert_eq!(filter.to_string(), "name:spider");
    }

    #[test]
    fn test_sort_rendering() {
        let sort = Sort::new(SortField::DateAdded, SortDirection::Desc);
        assert_eq!(sort.to_string(), "date_added:desc");
    }
}

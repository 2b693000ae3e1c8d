use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::errors::ValidationError;

/// Lifecycle state of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Draft,
    Active,
    Sold,
    Archived,
    Removed,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 5] = [
        ListingStatus::Draft,
        ListingStatus::Active,
        ListingStatus::Sold,
        ListingStatus::Archived,
        ListingStatus::Removed,
    ];

    /// States reachable in one step from `self`. `Removed` is terminal.
    pub fn allowed_transitions(&self) -> &'static [ListingStatus] {
        use ListingStatus::*;
        match self {
            Draft => &[Active, Archived, Removed],
            Active => &[Draft, Sold, Archived, Removed],
            Sold => &[Archived, Removed],
            Archived => &[Active, Removed],
            Removed => &[],
        }
    }

    pub fn can_transition_to(&self, target: ListingStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "DRAFT",
            ListingStatus::Active => "ACTIVE",
            ListingStatus::Sold => "SOLD",
            ListingStatus::Archived => "ARCHIVED",
            ListingStatus::Removed => "REMOVED",
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidField {
                field: "status".to_string(),
                value: s.to_string(),
                expected: "DRAFT, ACTIVE, SOLD, ARCHIVED or REMOVED".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ListingStatus::*;

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Draft, Active),
            (Draft, Archived),
            (Draft, Removed),
            (Active, Draft),
            (Active, Sold),
            (Active, Archived),
            (Active, Removed),
            (Sold, Archived),
            (Sold, Removed),
            (Archived, Active),
            (Archived, Removed),
        ];

        for from in ListingStatus::ALL {
            for to in ListingStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_removed_is_terminal() {
        assert!(Removed.is_terminal());
        assert!(!Sold.is_terminal());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("active".parse::<ListingStatus>().unwrap(), Active);
        assert_eq!(" SOLD ".parse::<ListingStatus>().unwrap(), Sold);
        assert!("PUBLISHED".parse::<ListingStatus>().is_err());
    }
}

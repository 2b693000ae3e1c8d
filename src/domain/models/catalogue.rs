use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::errors::ValidationError;

/// Closed set of listing categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
    Bags,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Tops,
        Category::Bottoms,
        Category::Dresses,
        Category::Outerwear,
        Category::Shoes,
        Category::Accessories,
        Category::Bags,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "TOPS",
            Category::Bottoms => "BOTTOMS",
            Category::Dresses => "DRESSES",
            Category::Outerwear => "OUTERWEAR",
            Category::Shoes => "SHOES",
            Category::Accessories => "ACCESSORIES",
            Category::Bags => "BAGS",
            Category::Other => "OTHER",
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidField {
                field: "category".to_string(),
                value: s.to_string(),
                expected: Category::ALL.map(|c| c.as_str()).join(", "),
            })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of item conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    NewWithTags,
    LikeNew,
    Excellent,
    Good,
    Fair,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::NewWithTags,
        Condition::LikeNew,
        Condition::Excellent,
        Condition::Good,
        Condition::Fair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::NewWithTags => "NEW_WITH_TAGS",
            Condition::LikeNew => "LIKE_NEW",
            Condition::Excellent => "EXCELLENT",
            Condition::Good => "GOOD",
            Condition::Fair => "FAIR",
        }
    }
}

impl FromStr for Condition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidField {
                field: "condition".to_string(),
                value: s.to_string(),
                expected: Condition::ALL.map(|c| c.as_str()).join(", "),
            })
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("bottoms".parse::<Category>().unwrap(), Category::Bottoms);
        assert_eq!("like_new".parse::<Condition>().unwrap(), Condition::LikeNew);
    }

    #[test]
    fn test_unknown_values_name_the_field() {
        let err = "hats".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("category"));
    }
}

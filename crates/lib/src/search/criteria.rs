use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SearchError;
use crate::constants::{ALL_CATEGORIES, ANY_AMOUNT};

/// Category selector.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Every category matches.
    #[default]
    All,
    /// Only this exact category matches.
    Only(String),
}

impl CategoryFilter {
    /// Interpret a selector value.
    ///
    /// Empty input, "all" and "All Industries" select every category;
    /// anything else is an exact category name.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(category) => f.write_str(category),
        }
    }
}

/// Requested-amount window. Both bounds inclusive; no upper bound means
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentRange {
    pub min: u64,
    pub max: Option<u64>,
}

const PRESETS: &[(&str, InvestmentRange)] = &[
    (ANY_AMOUNT, InvestmentRange::ANY),
    ("Under $100K", InvestmentRange::new(0, Some(100_000))),
    ("$100K - $500K", InvestmentRange::new(100_000, Some(500_000))),
    ("$500K - $1M", InvestmentRange::new(500_000, Some(1_000_000))),
    ("Over $1M", InvestmentRange::new(1_000_000, None)),
];

impl InvestmentRange {
    /// Matches every amount.
    pub const ANY: InvestmentRange = InvestmentRange { min: 0, max: None };

    pub const fn new(min: u64, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min && self.max.is_none_or(|max| amount <= max)
    }

    /// Whether the range places no restriction at all.
    pub fn is_unbounded(&self) -> bool {
        *self == Self::ANY
    }

    /// The preset ranges offered by the browse view, with their labels.
    pub fn presets() -> &'static [(&'static str, InvestmentRange)] {
        PRESETS
    }

    /// Resolve a preset label such as "$100K - $500K".
    ///
    /// An empty label means "Any Amount".
    pub fn from_label(label: &str) -> Result<Self, SearchError> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(Self::ANY);
        }
        PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, range)| *range)
            .ok_or_else(|| SearchError::UnknownRange {
                label: label.to_string(),
            })
    }
}

impl Default for InvestmentRange {
    fn default() -> Self {
        Self::ANY
    }
}

impl fmt::Display for InvestmentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((label, _)) = PRESETS.iter().find(|(_, range)| range == self) {
            return f.write_str(label);
        }
        match self.max {
            Some(max) => write!(f, "{} - {}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// The three browse criteria. The default matches the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Free text matched against name and description.
    pub term: String,
    pub category: CategoryFilter,
    pub range: InvestmentRange,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_range(mut self, range: InvestmentRange) -> Self {
        self.range = range;
        self
    }
}

/// Secondary ordering for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent contact activity first.
    #[default]
    Recent,
    /// Most unread messages first.
    Unread,
    /// Name, ascending.
    Alphabetical,
}

impl SortOrder {
    /// Label shown in the sort menu.
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Recent => "Most Recent",
            SortOrder::Unread => "Unread First",
            SortOrder::Alphabetical => "Alphabetical",
        }
    }
}

impl FromStr for SortOrder {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" => Ok(SortOrder::Recent),
            "unread" => Ok(SortOrder::Unread),
            "alphabetical" | "name" => Ok(SortOrder::Alphabetical),
            other => Err(SearchError::UnknownSortOrder {
                value: other.to_string(),
            }),
        }
    }
}

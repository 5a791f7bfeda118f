//! Structured representation of a supplier search.
//!
//! A [`Filter`] is rebuilt from the query string on every request and never
//! mutated in place: the builder methods consume the value and return the
//! next one, so a page always renders from the filter it was given.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{Rating, TypeConstraintError};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 12;
/// Largest page size accepted from a query string.
pub const MAX_PAGE_SIZE: usize = 100;

/// Sort keys understood by the listing endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Name,
    Rating,
    Newest,
    Popular,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Rating => "rating",
            SortBy::Newest => "newest",
            SortBy::Popular => "popular",
        }
    }
}

impl FromStr for SortBy {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortBy::Name),
            "rating" => Ok(SortBy::Rating),
            "newest" => Ok(SortBy::Newest),
            "popular" => Ok(SortBy::Popular),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort key {other:?}"
            ))),
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort order {other:?}"
            ))),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's current search, sort and pagination intent.
///
/// `None`, empty and `false` values mean "not set" and are never written
/// back into a query string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub rating: Option<Rating>,
    pub has_discount: bool,
    pub featured: bool,
    /// Tag set in first-seen order.
    pub tags: Vec<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    /// One-based page number.
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into().trim().to_string();
    (!value.is_empty()).then_some(value)
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = non_empty(search);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = non_empty(location);
        self
    }

    pub fn rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn has_discount(mut self, has_discount: bool) -> Self {
        self.has_discount = has_discount;
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// Adds a tag unless it is blank or already present.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        if let Some(tag) = non_empty(tag)
            && !self.tags.contains(&tag)
        {
            self.tags.push(tag);
        }
        self
    }

    pub fn sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = Some(sort_by);
        self.sort_order = Some(sort_order);
        self
    }

    /// Sets the page, ignoring zero.
    pub fn page(mut self, page: usize) -> Self {
        self.page = (page >= 1).then_some(page);
        self
    }

    /// Sets the page size, ignoring values outside `1..=MAX_PAGE_SIZE`.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = (1..=MAX_PAGE_SIZE).contains(&limit).then_some(limit);
        self
    }

    /// Page to request, defaulting to the first.
    pub fn page_or_default(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// Page size to request, defaulting to [`DEFAULT_PAGE_SIZE`].
    pub fn limit_or_default(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Number of narrowing filters in effect; sort and paging do not count.
    pub fn active_count(&self) -> usize {
        [
            self.search.is_some(),
            self.category.is_some(),
            self.location.is_some(),
            self.rating.is_some(),
            self.has_discount,
            self.featured,
            !self.tags.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Copy of this filter with the narrowing fields cleared, keeping sort
    /// and page size.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            limit: self.limit,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_skips_blank_values_and_duplicate_tags() {
        let filter = Filter::new()
            .search("   ")
            .location(" London ")
            .tag("Insurance")
            .tag("Insurance")
            .tag(" ");

        assert_eq!(filter.search, None);
        assert_eq!(filter.location.as_deref(), Some("London"));
        assert_eq!(filter.tags, vec!["Insurance".to_string()]);
    }

    #[test]
    fn page_and_limit_reject_out_of_range_values() {
        let filter = Filter::new().page(0).limit(500);
        assert_eq!(filter.page, None);
        assert_eq!(filter.limit, None);
        assert_eq!(filter.page_or_default(), 1);
        assert_eq!(filter.limit_or_default(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn active_count_ignores_sort_and_paging() {
        let filter = Filter::new()
            .search("CRM")
            .featured(true)
            .tag("Software")
            .sort(SortBy::Rating, SortOrder::Desc)
            .page(3);

        assert_eq!(filter.active_count(), 3);
        let cleared = filter.cleared();
        assert_eq!(cleared.active_count(), 0);
        assert_eq!(cleared.sort_by, Some(SortBy::Rating));
        assert_eq!(cleared.page, None);
    }

    #[test]
    fn sort_keys_parse_from_wire_names() {
        assert_eq!("popular".parse::<SortBy>().unwrap(), SortBy::Popular);
        assert!("reviews".parse::<SortBy>().is_err());
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
    }
}

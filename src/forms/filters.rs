//! Query-string codec for [`Filter`].
//!
//! The listing page keeps its whole state in the URL. [`decode`] is lenient:
//! unknown keys are ignored and malformed values are dropped rather than
//! rejected, so a hand-edited link never produces an error page. Text values
//! are trimmed on the way in and empty values never go out.

use crate::domain::filter::{Filter, MAX_PAGE_SIZE, SortBy, SortOrder};
use crate::domain::types::Rating;

/// Raw view of the listing query string; every value is kept as text so
/// that a single bad parameter does not fail the whole parse.
#[derive(Debug, Default)]
pub struct FilterQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub rating: Option<String>,
    pub has_discount: Option<String>,
    pub featured: Option<String>,
    pub tags: Vec<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl FromIterator<(String, String)> for FilterQuery {
    /// The first occurrence of a scalar key wins; every `tags` value is kept.
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = FilterQuery::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut query.search,
                "category" => &mut query.category,
                "location" => &mut query.location,
                "rating" => &mut query.rating,
                "hasDiscount" => &mut query.has_discount,
                "featured" => &mut query.featured,
                "sortBy" => &mut query.sort_by,
                "sortOrder" => &mut query.sort_order,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "tags" => {
                    query.tags.push(value);
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        query
    }
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn flag(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

fn number(value: Option<String>) -> Option<usize> {
    value.and_then(|v| v.trim().parse::<usize>().ok())
}

impl From<FilterQuery> for Filter {
    fn from(query: FilterQuery) -> Self {
        let rating = number(query.rating)
            .and_then(|v| u8::try_from(v).ok())
            .and_then(|v| Rating::new(v).ok());

        let mut filter = Filter {
            search: text(query.search),
            category: text(query.category),
            location: text(query.location),
            rating,
            has_discount: flag(query.has_discount),
            featured: flag(query.featured),
            tags: Vec::new(),
            sort_by: text(query.sort_by).and_then(|v| v.parse::<SortBy>().ok()),
            sort_order: text(query.sort_order).and_then(|v| v.parse::<SortOrder>().ok()),
            page: number(query.page).filter(|page| *page >= 1),
            limit: number(query.limit).filter(|limit| (1..=MAX_PAGE_SIZE).contains(limit)),
        };

        for tag in query.tags {
            filter = filter.tag(tag);
        }

        filter
    }
}

/// Parses a raw query string (without the leading `?`) into a [`Filter`].
pub fn decode(query_string: &str) -> Filter {
    match serde_html_form::from_str::<Vec<(String, String)>>(query_string) {
        Ok(pairs) => pairs.into_iter().collect::<FilterQuery>().into(),
        Err(err) => {
            log::warn!("Ignoring malformed filter query {query_string:?}: {err}");
            Filter::default()
        }
    }
}

/// Flattens a filter into `(key, value)` pairs in declaration order,
/// skipping everything that is unset.
pub fn to_pairs(filter: &Filter) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();

    let texts = [
        ("search", &filter.search),
        ("category", &filter.category),
        ("location", &filter.location),
    ];
    for (key, value) in texts {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            pairs.push((key, value.to_string()));
        }
    }
    if let Some(rating) = filter.rating {
        pairs.push(("rating", rating.to_string()));
    }
    if filter.has_discount {
        pairs.push(("hasDiscount", "true".to_string()));
    }
    if filter.featured {
        pairs.push(("featured", "true".to_string()));
    }
    for tag in filter.tags.iter().filter(|tag| !tag.is_empty()) {
        pairs.push(("tags", tag.clone()));
    }
    if let Some(sort_by) = filter.sort_by {
        pairs.push(("sortBy", sort_by.to_string()));
    }
    if let Some(sort_order) = filter.sort_order {
        pairs.push(("sortOrder", sort_order.to_string()));
    }
    if let Some(page) = filter.page {
        pairs.push(("page", page.to_string()));
    }
    if let Some(limit) = filter.limit {
        pairs.push(("limit", limit.to_string()));
    }

    pairs
}

/// Serializes a filter into a form-urlencoded query string.
pub fn encode(filter: &Filter) -> String {
    let pairs = to_pairs(filter);
    serde_html_form::to_string(&pairs).unwrap_or_else(|err| {
        log::error!("Failed to encode filter {filter:?}: {err}");
        String::new()
    })
}

/// Query string for the same filter on another page; used by pager links.
pub fn encode_page(filter: &Filter, page: usize) -> String {
    encode(&filter.clone().page(page))
}

//! Paging cursor for list endpoints.
//!
//! Every list call takes a [`PagingInput`] and returns the parsed `Link` header
//! relations next to the decoded body. [`PagingInput::next_page`] turns the two
//! into the input of the following call, so callers can loop until it is `None`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortDirection {
    #[strum(serialize = "ASC")]
    Ascending,
    #[strum(serialize = "DESC")]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// All values must match. Values are joined with `;`.
    And,
    /// Any value may match. Values are joined with `,`.
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub kind: FilterKind,
    pub field: String,
    pub values: Vec<String>,
}

impl Filter {
    fn joined(&self) -> String {
        let separator = match self.kind {
            FilterKind::And => ";",
            FilterKind::Or => ",",
        };
        self.values.join(separator)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingInput {
    /// Requested page size, `0` lets the platform pick.
    pub per_page: u32,
    /// 1-based page number, `0` lets the platform pick (the first page).
    pub page: u32,
    pub sort_direction: Option<SortDirection>,
    pub sort_by: Vec<String>,
    pub filters: Vec<Filter>,
}

impl PagingInput {
    pub fn new(per_page: u32, page: u32) -> Self {
        Self {
            per_page,
            page,
            ..Default::default()
        }
    }

    pub fn with_sort(mut self, direction: SortDirection, fields: &[&str]) -> Self {
        self.sort_direction = Some(direction);
        self.sort_by = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_filter_and(mut self, field: impl Into<String>, values: &[&str]) -> Self {
        self.push_filter(FilterKind::And, field.into(), values);
        self
    }

    pub fn with_filter_or(mut self, field: impl Into<String>, values: &[&str]) -> Self {
        self.push_filter(FilterKind::Or, field.into(), values);
        self
    }

    fn push_filter(&mut self, kind: FilterKind, field: String, values: &[&str]) {
        self.filters.push(Filter {
            kind,
            field,
            values: values.iter().map(|v| v.to_string()).collect(),
        });
    }

    /// Query parameters appended to the list request.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if self.per_page > 0 {
            pairs.push(("per-page".to_string(), self.per_page.to_string()));
        }
        if self.page > 0 {
            pairs.push(("page".to_string(), self.page.to_string()));
        }
        if let Some(direction) = self.sort_direction {
            pairs.push(("direction".to_string(), direction.to_string()));
        }
        if !self.sort_by.is_empty() {
            pairs.push(("sort-by".to_string(), self.sort_by.join(",")));
        }
        for filter in &self.filters {
            pairs.push((filter.field.clone(), filter.joined()));
        }
        pairs
    }

    /// Input for the following page, or `None` when the page came back short, the
    /// platform did not advertise a `next` relation or the page number is exhausted.
    pub fn next_page(&self, links: &Links, item_count: usize) -> Option<PagingInput> {
        if self.per_page == 0 || item_count != self.per_page as usize || !links.has_next() {
            return None;
        }
        Some(PagingInput {
            page: self.page.max(1).checked_add(1)?,
            ..self.clone()
        })
    }
}

/// Relations parsed from a `Link` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    relations: HashMap<String, String>,
}

impl Links {
    pub fn parse(header: &str) -> Self {
        static LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r#"<([^>]*)>\s*;\s*rel="?([^",;]+)"?"#)
                .expect("Should be able to compile link header regex.")
        });

        let relations = LINK_REGEX
            .captures_iter(header)
            .map(|c| (c[2].to_string(), c[1].to_string()))
            .collect();
        Self { relations }
    }

    pub fn with(mut self, rel: impl Into<String>, url: impl Into<String>) -> Self {
        self.relations.insert(rel.into(), url.into());
        self
    }

    pub fn get(&self, rel: &str) -> Option<&str> {
        self.relations.get(rel).map(|s| s.as_str())
    }

    pub fn has_next(&self) -> bool {
        self.relations.contains_key("next")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_link_relations() {
        let links = Links::parse(
            r#"<https://app.modzy.com/api/jobs/history?page=2>; rel="next", <https://app.modzy.com/api/jobs/history?page=9>; rel="last""#,
        );
        assert_eq!(
            links.get("next"),
            Some("https://app.modzy.com/api/jobs/history?page=2")
        );
        assert!(links.get("last").is_some());
        assert!(links.get("prev").is_none());
    }

    #[test]
    fn query_pairs_join_filters() {
        let paging = PagingInput::new(20, 3)
            .with_sort(SortDirection::Descending, &["submittedAt", "status"])
            .with_filter_and("model", &["a", "b"])
            .with_filter_or("status", &["COMPLETED", "CANCELED"]);

        assert_eq!(
            paging.query_pairs(),
            vec![
                ("per-page".to_string(), "20".to_string()),
                ("page".to_string(), "3".to_string()),
                ("direction".to_string(), "DESC".to_string()),
                ("sort-by".to_string(), "submittedAt,status".to_string()),
                ("model".to_string(), "a;b".to_string()),
                ("status".to_string(), "COMPLETED,CANCELED".to_string()),
            ]
        );
    }

    #[test]
    fn unset_paging_sends_nothing() {
        assert!(PagingInput::default().query_pairs().is_empty());
    }

    #[rstest]
    #[case(10, true, Some(3))]
    #[case(9, true, None)]
    #[case(10, false, None)]
    #[case(0, true, None)]
    fn next_page_needs_full_page_and_next_link(
        #[case] items: usize,
        #[case] has_next: bool,
        #[case] expected_page: Option<u32>,
    ) {
        let paging = PagingInput::new(10, 2).with_filter_or("status", &["COMPLETED"]);
        let links = if has_next {
            Links::default().with("next", "https://x?page=3")
        } else {
            Links::default()
        };

        let next = paging.next_page(&links, items);
        assert_eq!(next.as_ref().map(|p| p.page), expected_page);
        if let Some(next) = next {
            assert_eq!(next.per_page, 10);
            assert_eq!(next.filters, paging.filters);
        }
    }

    #[test]
    fn last_page_number_has_no_successor() {
        let links = Links::default().with("next", "https://x");
        assert_eq!(PagingInput::new(5, u32::MAX).next_page(&links, 5), None);
        assert_eq!(
            PagingInput::new(5, 0).next_page(&links, 5).map(|p| p.page),
            Some(2)
        );
    }
}

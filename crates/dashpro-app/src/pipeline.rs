// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::borrow::Cow;

/// A row that can flow through the search/paginate pipeline.
///
/// `FIELDS` lists every name `field_text` answers for. Search field lists are
/// checked against it before any filtering happens.
pub trait Record {
    const FIELDS: &'static [&'static str];

    fn id(&self) -> i64;
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a, R> {
    pub page_records: Vec<&'a R>,
    /// 1-based position of the first record on this page, 0 when nothing matched.
    pub start_index: usize,
    /// 1-based position of the last record on this page, 0 when nothing matched.
    pub end_index: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl<R> PageView<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.page_records.is_empty()
    }
}

pub fn validate_search_fields<R: Record>(search_fields: &[&str]) -> Result<()> {
    for field in search_fields {
        if !R::FIELDS.contains(field) {
            bail!(
                "search field `{field}` is not a field of this record type; known fields: {}",
                R::FIELDS.join(", ")
            );
        }
    }
    Ok(())
}

pub fn query_is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Keep the records where any search field contains the query, ignoring case.
/// A blank query keeps everything. Relative order is preserved.
pub fn filter_records<'a, R: Record>(
    records: &'a [R],
    query: &str,
    search_fields: &[&str],
) -> Vec<&'a R> {
    if query_is_blank(query) {
        return records.iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            search_fields.iter().any(|field| {
                record
                    .field_text(field)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    item_count.div_ceil(page_size).max(1)
}

pub fn compute<'a, R: Record>(
    records: &'a [R],
    query: &str,
    current_page: usize,
    page_size: usize,
    search_fields: &[&str],
) -> Result<PageView<'a, R>> {
    if page_size == 0 {
        bail!("page size must be positive");
    }
    if current_page == 0 {
        bail!("page numbers start at 1");
    }
    validate_search_fields::<R>(search_fields)?;

    let filtered = filter_records(records, query, search_fields);
    Ok(paginate(filtered, current_page, page_size))
}

pub(crate) fn paginate<R>(
    filtered: Vec<&R>,
    current_page: usize,
    page_size: usize,
) -> PageView<'_, R> {
    let total_items = filtered.len();
    let start = (current_page - 1).saturating_mul(page_size).min(total_items);
    let end = current_page.saturating_mul(page_size).min(total_items);
    let page_records = filtered[start..end].to_vec();
    let (start_index, end_index) = if page_records.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    PageView {
        page_records,
        start_index,
        end_index,
        total_items,
        total_pages: total_pages(total_items, page_size),
        current_page,
    }
}

/// Query and page position for one list. Page size is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    query: String,
    current_page: usize,
    page_size: usize,
}

impl ListQuery {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            bail!("page size must be positive");
        }
        Ok(Self {
            query: String::new(),
            current_page: 1,
            page_size,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the query. A different query always starts over at page 1.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_owned();
        self.current_page = 1;
        true
    }

    /// Move to `page` when it lies in `1..=total_pages`; anything else is ignored.
    pub fn request_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages.max(1) || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Pull the page back into range after the record set shrank.
    pub fn clamp_to(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }

    pub fn compute<'a, R: Record>(
        &self,
        records: &'a [R],
        search_fields: &[&str],
    ) -> Result<PageView<'a, R>> {
        compute(
            records,
            &self.query,
            self.current_page,
            self.page_size,
            search_fields,
        )
    }
}

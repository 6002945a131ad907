// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::time::{Duration, Instant};

use crate::pipeline::{
    ListQuery, PageView, Record, filter_records, paginate, total_pages, validate_search_fields,
};
use crate::timer::ScheduledTask;

pub const DASHBOARD_LOAD_DELAY: Duration = Duration::from_millis(800);
pub const PRODUCTS_LOAD_DELAY: Duration = Duration::from_millis(600);
pub const USERS_LOAD_DELAY: Duration = Duration::from_millis(500);

/// Owns one page's record set, its simulated load, and its list position.
///
/// The pending load lives inside the container, so dropping the container is
/// the teardown: a load that has not fired yet can never write into it.
#[derive(Debug)]
pub struct PageContainer<R> {
    records: Vec<R>,
    loaded: bool,
    load: ScheduledTask,
    list: ListQuery,
    search_fields: &'static [&'static str],
}

impl<R: Record> PageContainer<R> {
    pub fn new(
        page_size: usize,
        search_fields: &'static [&'static str],
        load_delay: Duration,
        now: Instant,
    ) -> Result<Self> {
        validate_search_fields::<R>(search_fields)?;
        Ok(Self {
            records: Vec::new(),
            loaded: false,
            load: ScheduledTask::after(now, load_delay),
            list: ListQuery::new(page_size)?,
            search_fields,
        })
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.load.due()
    }

    /// Populate the record set once the load delay has passed. Returns true
    /// on the tick the load lands. A failing loader still ends the loading
    /// state, leaving the set empty, and hands the error back.
    pub fn poll_load<F>(&mut self, now: Instant, loader: F) -> Result<bool>
    where
        F: FnOnce() -> Result<Vec<R>>,
    {
        if !self.load.fire(now) {
            return Ok(false);
        }
        self.loaded = true;
        self.records = loader()?;
        self.list.clamp_to(self.total_pages());
        tracing::debug!(records = self.records.len(), "page records loaded");
        Ok(true)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn search_fields(&self) -> &'static [&'static str] {
        self.search_fields
    }

    pub fn query(&self) -> &str {
        self.list.query()
    }

    pub fn current_page(&self) -> usize {
        self.list.current_page()
    }

    pub fn page_size(&self) -> usize {
        self.list.page_size()
    }

    pub fn filtered_count(&self) -> usize {
        filter_records(&self.records, self.list.query(), self.search_fields).len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.list.page_size())
    }

    pub fn view(&self) -> PageView<'_, R> {
        let filtered = filter_records(&self.records, self.list.query(), self.search_fields);
        paginate(filtered, self.list.current_page(), self.list.page_size())
    }

    pub fn set_query(&mut self, query: &str) -> bool {
        let changed = self.list.set_query(query);
        if changed {
            tracing::debug!(query, "list query changed");
        }
        changed
    }

    pub fn request_page(&mut self, page: usize) -> bool {
        let total = self.total_pages();
        self.list.request_page(page, total)
    }

    pub fn find(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn delete(&mut self, id: i64) -> Option<R> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        let removed = self.records.remove(index);
        self.list.clamp_to(self.total_pages());
        tracing::debug!(id, remaining = self.records.len(), "record deleted");
        Some(removed)
    }

    pub fn update<F>(&mut self, id: i64, change: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        let Some(record) = self.records.iter_mut().find(|record| record.id() == id) else {
            return false;
        };
        change(record);
        // An edit can move a record out of the current filter.
        self.list.clamp_to(self.total_pages());
        true
    }
}

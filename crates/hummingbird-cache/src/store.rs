//! Id-keyed record store
//!
//! Records are kept in arrival order in a `Vec` with a side index from id to
//! position, so upserts are O(1) and re-queries start from a deterministic
//! base order before the stable sort is applied.

use std::collections::HashMap;

use hummingbird_core::domain::{filter_and_sort, ListRecord, Page, SortSpec};
use tracing::{debug, trace};

use crate::CacheError;

/// Session-scoped cache of `R`
#[derive(Debug, Clone)]
pub struct RecordCache<R> {
    records: Vec<R>,
    index: HashMap<String, usize>,
    /// Size of the unfiltered remote dataset, from the last unfiltered page
    dataset_total: Option<u64>,
    /// Last unfiltered page stored (0 when none)
    last_page: u32,
}

impl<R: ListRecord> RecordCache<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            dataset_total: None,
            last_page: 0,
        }
    }

    /// Replaces all contents with `page` (a fresh unfiltered first page)
    pub fn replace_page(&mut self, page: Page<R>) {
        let page_number = page.page_number();
        let total = page.total_items();
        self.clear();
        for record in page.into_items() {
            self.upsert(record);
        }
        self.dataset_total = Some(total);
        self.last_page = page_number;
        debug!(page = page_number, len = self.records.len(), total, "Cache replaced");
    }

    /// Appends the next unfiltered page
    ///
    /// Records whose id is already cached are replaced in place.
    ///
    /// # Errors
    /// Returns [`CacheError::OutOfOrderPage`] unless `page` directly follows
    /// the last stored page. The cache is left untouched in that case.
    pub fn append_page(&mut self, page: Page<R>) -> Result<(), CacheError> {
        let expected = self.last_page + 1;
        if page.page_number() != expected {
            return Err(CacheError::OutOfOrderPage {
                expected,
                got: page.page_number(),
            });
        }

        let page_number = page.page_number();
        let total = page.total_items();
        for record in page.into_items() {
            self.upsert(record);
        }
        self.dataset_total = Some(total);
        self.last_page = page_number;
        debug!(page = page_number, len = self.records.len(), total, "Cache appended");
        Ok(())
    }

    /// Upserts records from a filtered result
    ///
    /// Filtered pages say nothing about the size of the full dataset, so the
    /// dataset total and page cursor are left alone. Returns how many records
    /// were new to the cache.
    pub fn merge_records<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = R>,
    {
        let before = self.records.len();
        for record in records {
            self.upsert(record);
        }
        let added = self.records.len() - before;
        trace!(added, len = self.records.len(), "Cache merged");
        added
    }

    /// Every cached record, ordered by `sort`
    pub fn query_all(&self, sort: SortSpec) -> Vec<R> {
        filter_and_sort(&self.records, "", sort)
    }

    /// Cached records whose display name contains `filter_text`
    /// (case-insensitive), ordered by `sort`
    pub fn query(&self, filter_text: &str, sort: SortSpec) -> Vec<R> {
        filter_and_sort(&self.records, filter_text, sort)
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Size of the unfiltered dataset as last reported by the remote source
    pub fn dataset_total(&self) -> Option<u64> {
        self.dataset_total
    }

    /// Last unfiltered page stored; 0 when none
    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    /// Returns true once every record of the remote dataset is resident
    pub fn is_complete(&self) -> bool {
        match self.dataset_total {
            Some(total) => self.records.len() as u64 >= total,
            None => false,
        }
    }

    /// Drops every record and forgets the dataset size
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.dataset_total = None;
        self.last_page = 0;
    }

    fn upsert(&mut self, record: R) {
        match self.index.get(record.id()) {
            Some(&i) => self.records[i] = record,
            None => {
                self.index.insert(record.id().to_string(), self.records.len());
                self.records.push(record);
            }
        }
    }
}

impl<R: ListRecord> Default for RecordCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

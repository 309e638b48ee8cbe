//! In-memory record storage and case-insensitive field lookup.
//!
//! A [`RecordBatch`] holds every row of one input under a shared header list.
//! Field names are trimmed and case-folded once into a [`HeaderIndex`]; the
//! first header with a given folded name wins.

use std::collections::HashMap;

use crate::schema::ColumnSpec;

#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            positions.entry(fold(header)).or_insert(idx);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&fold(name)).copied()
    }

    /// Resolves every output column to a field position, `None` when absent.
    pub fn resolve(&self, columns: &[ColumnSpec]) -> Vec<Option<usize>> {
        columns
            .iter()
            .map(|column| self.position(&column.name))
            .collect()
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    headers: Vec<String>,
    index: HeaderIndex,
    rows: Vec<Vec<String>>,
}

impl RecordBatch {
    pub fn new(headers: Vec<String>) -> Self {
        let index = HeaderIndex::new(&headers);
        Self {
            headers,
            index,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut batch = Self::new(headers);
        batch.rows = rows;
        batch
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn index(&self) -> &HeaderIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |values| Record {
            index: &self.index,
            values,
        })
    }
}

/// One input row viewed through its batch's header index.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    index: &'a HeaderIndex,
    values: &'a [String],
}

impl<'a> Record<'a> {
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.index.position(name).and_then(|idx| self.field(idx))
    }

    /// Field at `idx`; short rows yield `None` for trailing positions.
    pub fn field(&self, idx: usize) -> Option<&'a str> {
        self.values.get(idx).map(|value| value.as_str())
    }

    /// Field value for a resolved position, with absent fields read as empty.
    pub fn value_or_empty(&self, position: Option<usize>) -> &'a str {
        position.and_then(|idx| self.field(idx)).unwrap_or("")
    }
}

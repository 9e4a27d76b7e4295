//! Source mapping records and the open/close tracker.
//!
//! A mapping is opened when a node starts emitting and closed when it
//! finishes. Opens and closes nest like a stack; closing anything but the
//! most recent open mapping is an internal error. Records are kept in open
//! order, so a parent mapping precedes the mappings of its children.

use crate::error::EmitError;
use jxc_common::limits::MAPPINGS_INITIAL_CAPACITY;
use jxc_common::{Position, SourceRange};
use serde::Serialize;
use std::sync::Arc;

/// One source-to-output correspondence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub source_path: Arc<str>,
    pub source_start: Position,
    pub source_end: Position,
    pub generated_start: Position,
    pub generated_end: Position,
    /// Source identifier text, for name-carrying mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Handle returned by `MappingTracker::open`, consumed by `close`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an open mapping must be closed"]
pub struct MappingToken(usize);

#[derive(Debug)]
pub struct MappingTracker {
    source_path: Arc<str>,
    records: Vec<Mapping>,
    /// Indices into `records` of mappings not yet closed.
    open: Vec<usize>,
}

impl MappingTracker {
    pub fn new(source_path: &str) -> Self {
        Self {
            source_path: Arc::from(source_path),
            records: Vec::with_capacity(MAPPINGS_INITIAL_CAPACITY),
            open: Vec::new(),
        }
    }

    pub fn open(
        &mut self,
        source: SourceRange,
        generated_start: Position,
        name: Option<String>,
    ) -> MappingToken {
        let index = self.records.len();
        self.records.push(Mapping {
            source_path: Arc::clone(&self.source_path),
            source_start: source.start,
            source_end: source.end,
            generated_start,
            generated_end: generated_start,
            name,
        });
        self.open.push(index);
        MappingToken(index)
    }

    /// Close the most recently opened mapping.
    pub fn close(&mut self, token: MappingToken, generated_end: Position) -> Result<(), EmitError> {
        let Some(&top) = self.open.last() else {
            return Err(EmitError::MappingUnderflow);
        };
        if top != token.0 {
            return Err(EmitError::MappingMismatch {
                expected: top,
                found: token.0,
            });
        }
        self.open.pop();
        if let Some(record) = self.records.get_mut(top) {
            record.generated_end = generated_end;
        }
        Ok(())
    }

    /// Number of mappings currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn records(&self) -> &[Mapping] {
        &self.records
    }

    /// Finished records; every mapping must have been closed.
    pub fn finish(self) -> Result<Vec<Mapping>, EmitError> {
        if !self.open.is_empty() {
            return Err(EmitError::UnclosedMappings {
                count: self.open.len(),
            });
        }
        Ok(self.records)
    }
}

#[cfg(test)]
#[path = "../tests/mapping.rs"]
mod tests;

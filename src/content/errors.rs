//! Content-authoring errors and their accumulator.
//!
//! Loading never stops at the first bad field. Every problem is turned into a
//! [`ContentError`], pushed into the [`ErrorReporter`] resource and logged; the
//! offending item is skipped or left with defaults, and the full list is
//! surfaced once the load pass is over.

use bevy_ecs::prelude::Resource;
use log::warn;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("state \"{state}\" of mob type \"{type_name}\" switches to an unknown state \"{target}\"")]
    UnresolvedState {
        type_name: String,
        state: String,
        target: String,
    },

    #[error("mob type \"{type_name}\" has no state called \"{state}\" to start in")]
    MissingInitialState { type_name: String, state: String },

    #[error("mob type \"{type_name}\": {registered} states registered, {expected} in enum")]
    StateCountMismatch {
        type_name: String,
        registered: usize,
        expected: usize,
    },

    #[error("{source_name}: unknown script event name \"{name}\"")]
    UnknownEvent { source_name: String, name: String },

    #[error("{source_name}: unknown script action \"{name}\"")]
    UnknownAction { source_name: String, name: String },

    #[error("{source_name}: action \"{action}\": {reason}")]
    BadActionArgs {
        source_name: String,
        action: String,
        reason: String,
    },

    #[error("{source_name}: invalid value \"{value}\" for \"{field}\"")]
    InvalidValue {
        source_name: String,
        field: String,
        value: String,
    },

    #[error("unknown mob category \"{name}\"")]
    UnknownCategory { name: String },

    #[error("unknown mob type \"{name}\" in category \"{category}\"")]
    UnknownType { category: String, name: String },

    #[error("{source_name}: malformed data: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates content errors for one load pass.
#[derive(Resource, Debug, Default)]
pub struct ErrorReporter {
    errors: Vec<ContentError>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error and logs it.
    pub fn report(&mut self, error: ContentError) {
        warn!("Content error: {}", error);
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ContentError] {
        &self.errors
    }

    /// Moves every error of `other` into this reporter.
    pub fn absorb(&mut self, other: &mut ErrorReporter) {
        self.errors.append(&mut other.errors);
    }
}

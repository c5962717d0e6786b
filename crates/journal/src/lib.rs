// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Durable storage engine for deskfs: an append-only transaction
//! journal.
//!
//! Every committed batch is one JSON record on one line; opening the
//! engine replays the journal into in-memory tables and serves reads
//! from there. A batch is durable exactly when its line has been
//! flushed — a crash mid-append leaves a torn trailing line that the
//! next open discards. `compact` rewrites history as a single snapshot
//! record.

mod engine;
mod error;
mod record;

pub use engine::JournalEngine;
pub use error::{JournalError, Result};
pub use record::{Record, RecordOp};

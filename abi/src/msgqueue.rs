//! Message-queue identifiers and sizing shared between the core crate and
//! its tests.

/// A message-queue identifier, an index into the global queue table.
pub type QueueId = usize;

/// Sentinel returned by `pcount` distinguishing "queue empty, N receivers
/// waiting" from "queue non-empty, M units buffered or waiting to send" —
/// see the component design for the exact sign convention.
pub const INVALID_QUEUE_ID: QueueId = usize::MAX;

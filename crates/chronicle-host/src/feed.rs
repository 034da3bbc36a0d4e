//! Blocking row feed between a host-side producer and the query engine.
//!
//! A [`RowFeed`] is the consumer half of a producer-driven sequence of rows.
//! The consumer blocks on [`RowFeed::next_row`] until the producer yields a
//! row or drops its [`RowSender`], which closes the feed. Closure is the
//! only termination signal — there is no count and no timeout; a feed that
//! never closes blocks the invocation, and the invocation envelope owns any
//! deadline.

use std::sync::mpsc;

use crate::Row;

/// Producer half of a row feed.
///
/// Dropping the sender closes the feed. Sending on a feed whose consumer is
/// gone reports whether the row was delivered; producers may stop early when
/// it was not.
#[derive(Debug)]
pub struct RowSender {
    tx: mpsc::Sender<Row>,
}

impl RowSender {
    /// Yields one row to the consumer.
    ///
    /// Returns `false` if the consumer has been dropped.
    pub fn send(&self, row: Row) -> bool {
        self.tx.send(row).is_ok()
    }
}

/// Consumer half of a row feed.
#[derive(Debug)]
pub struct RowFeed {
    rx: mpsc::Receiver<Row>,
}

impl RowFeed {
    /// Creates a connected producer/consumer pair.
    pub fn channel() -> (RowSender, RowFeed) {
        let (tx, rx) = mpsc::channel();
        (RowSender { tx }, RowFeed { rx })
    }

    /// Builds an already-closed feed over a fixed set of rows.
    ///
    /// Useful for hosts that materialise their result set before handing it
    /// to the consumer.
    pub fn from_rows(rows: Vec<Row>) -> RowFeed {
        let (tx, feed) = Self::channel();
        for row in rows {
            // The consumer cannot be gone yet; it is in `feed`.
            let _ = tx.send(row);
        }
        feed
    }

    /// Blocks until the producer yields the next row, or returns `None` once
    /// the feed is closed and drained.
    pub fn next_row(&self) -> Option<Row> {
        self.rx.recv().ok()
    }
}

impl Iterator for RowFeed {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.next_row()
    }
}

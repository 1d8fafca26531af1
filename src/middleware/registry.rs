//! Ordered, name-addressable middleware registry.
//!
//! # State machine
//!
//! ```text
//!            load / append / prepend / before / after
//!                  ┌──────┐
//!                  ▼      │
//!   new ──────►  OPEN ────┘
//!                  │  ▲
//!         finish() │  │ any successful mutation
//!                  ▼  │
//!               COMMITTED ──┐
//!                  ▲        │ finish(): warn, no-op
//!                  └────────┘
//! ```
//!
//! Every mutation checks name uniqueness before touching the sequence, so a
//! failed call leaves the registry exactly as it was.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::{Entry, Sink};
use crate::error::Error;

const ALREADY_APPLIED: &str = "middlewares have already been applied";

/// An ordered list of named middlewares, committed once into a [`Sink`].
///
/// Every mutator returns `Result<&mut Registry, Error>`, so a whole setup
/// reads as one chain:
///
/// ```rust
/// use ordo::{App, Request, Response};
/// use ordo::middleware::{Entry, Next};
///
/// async fn pass(req: Request, next: Next) -> Response { next.run(req).await }
///
/// # fn main() -> Result<(), ordo::Error> {
/// let mut app = App::default();
/// app.load_middlewares([Entry::new("logger", pass), Entry::new("auth", pass)])?
///     .prepend([Entry::new("request-id", pass)])?
///     .after("auth", Entry::new("admin", pass).path("/admin"))?;
///
/// assert_eq!(app.middlewares().names(), ["request-id", "logger", "auth", "admin"]);
/// app.finish();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    committed: bool,
}

#[derive(Clone, Copy, Debug)]
enum Position {
    Before,
    After,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole sequence with `entries`, in the given order.
    ///
    /// Fails with [`Error::DuplicateName`] if two incoming entries share a
    /// name; the previous sequence is kept in that case.
    pub fn load(&mut self, entries: impl IntoIterator<Item = Entry>) -> Result<&mut Self, Error> {
        let entries: Vec<Entry> = entries.into_iter().collect();
        ensure_unique(&[], &entries)?;

        debug!(count = entries.len(), "middlewares loaded");
        self.entries = entries;
        self.committed = false;
        Ok(self)
    }

    /// Adds `entries`, in order, after the current sequence.
    ///
    /// Fails with [`Error::DuplicateName`] if any incoming name is already
    /// present or repeats within `entries`. Nothing is inserted on failure.
    pub fn append(&mut self, entries: impl IntoIterator<Item = Entry>) -> Result<&mut Self, Error> {
        let entries: Vec<Entry> = entries.into_iter().collect();
        ensure_unique(&self.entries, &entries)?;

        debug!(count = entries.len(), "middlewares appended");
        self.entries.extend(entries);
        self.committed = false;
        Ok(self)
    }

    /// Adds `entries`, in order, in front of the current sequence.
    ///
    /// Same duplicate contract as [`append`](Registry::append).
    pub fn prepend(&mut self, entries: impl IntoIterator<Item = Entry>) -> Result<&mut Self, Error> {
        let entries: Vec<Entry> = entries.into_iter().collect();
        ensure_unique(&self.entries, &entries)?;

        debug!(count = entries.len(), "middlewares prepended");
        let rest = std::mem::replace(&mut self.entries, entries);
        self.entries.extend(rest);
        self.committed = false;
        Ok(self)
    }

    /// Inserts `entry` immediately before the entry named `target`.
    ///
    /// Fails with [`Error::NotFound`] if `target` is absent, or
    /// [`Error::DuplicateName`] if `entry`'s name is already taken.
    pub fn before(&mut self, target: &str, entry: Entry) -> Result<&mut Self, Error> {
        self.insert(target, entry, Position::Before)
    }

    /// Inserts `entry` immediately after the entry named `target`.
    ///
    /// Same failure modes as [`before`](Registry::before).
    pub fn after(&mut self, target: &str, entry: Entry) -> Result<&mut Self, Error> {
        self.insert(target, entry, Position::After)
    }

    fn insert(&mut self, target: &str, entry: Entry, at: Position) -> Result<&mut Self, Error> {
        let index = self.position(target).ok_or_else(|| Error::NotFound(target.to_owned()))?;
        if self.contains(entry.name()) {
            return Err(Error::DuplicateName(entry.name().to_owned()));
        }

        trace!(name = entry.name(), anchor = target, position = ?at, "middleware inserted");
        let index = match at {
            Position::Before => index,
            Position::After => index + 1,
        };
        self.entries.insert(index, entry);
        self.committed = false;
        Ok(self)
    }

    /// Hands every entry, in order, to `sink` and empties the registry.
    ///
    /// Pathed entries go to [`Sink::register_scoped`], the rest to
    /// [`Sink::register_global`]. Calling `finish` again without mutating
    /// the registry in between applies nothing and only reports a warning
    /// through [`Sink::warn`].
    pub fn finish<S: Sink + ?Sized>(&mut self, sink: &mut S) {
        if self.committed {
            sink.warn(ALREADY_APPLIED);
            return;
        }

        let count = self.entries.len();
        for entry in self.entries.drain(..) {
            let (name, path, middleware) = entry.into_parts();
            trace!(name = %name, path = ?path, "applying middleware");
            match path {
                Some(path) => sink.register_scoped(&path, middleware),
                None => sink.register_global(middleware),
            }
        }
        self.committed = true;
        debug!(count, "middlewares applied");
    }

    /// Names in their current order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(Entry::name).collect()
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn is_committed(&self) -> bool { self.committed }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }
}

/// Checks that `incoming` introduces no name already in `existing` and
/// repeats none of its own.
fn ensure_unique(existing: &[Entry], incoming: &[Entry]) -> Result<(), Error> {
    let mut seen: HashSet<&str> = existing.iter().map(Entry::name).collect();
    for entry in incoming {
        if !seen.insert(entry.name()) {
            return Err(Error::DuplicateName(entry.name().to_owned()));
        }
    }
    Ok(())
}

//! Cache-update plans.
//!
//! A [`CacheUpdate`] is what one successful mutation does to the query
//! cache. Plans are plain data computed from the mutation's scope, options
//! and response; [`QueryClient::apply`](crate::QueryClient::apply) executes
//! them in the order remove, update, invalidate.

use std::fmt;

use serde_json::Value;

use crate::query::{KeyFilter, QueryKey};

/// Cache actions triggered by one successful mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheUpdate {
    /// Entries marked stale. They stay readable until refetched.
    pub invalidate: Vec<KeyFilter>,
    /// Entries rewritten in place.
    pub update: Vec<CacheUpdateEntry>,
    /// Entries dropped outright.
    pub remove: Vec<KeyFilter>,
}

impl CacheUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn invalidate(mut self, filter: impl Into<KeyFilter>) -> Self {
        let filter = filter.into();
        if !self.invalidate.contains(&filter) {
            self.invalidate.push(filter);
        }
        self
    }

    #[must_use]
    pub fn update(mut self, key: QueryKey, updater: Updater) -> Self {
        self.update.push(CacheUpdateEntry { key, updater });
        self
    }

    #[must_use]
    pub fn remove(mut self, filter: impl Into<KeyFilter>) -> Self {
        let filter = filter.into();
        if !self.remove.contains(&filter) {
            self.remove.push(filter);
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invalidate.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }

    /// Total number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invalidate.len() + self.update.len() + self.remove.len()
    }
}

impl fmt::Display for CacheUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "(no cache changes)");
        }
        for filter in &self.remove {
            writeln!(f, "remove      {filter}")?;
        }
        for entry in &self.update {
            writeln!(f, "update      {} ({})", entry.key, entry.updater.label())?;
        }
        for filter in &self.invalidate {
            writeln!(f, "invalidate  {filter}")?;
        }
        Ok(())
    }
}

/// One in-place rewrite of a cached value.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheUpdateEntry {
    pub key: QueryKey,
    pub updater: Updater,
}

/// Computes a new cached value from the current one.
#[derive(Debug, Clone, PartialEq)]
pub enum Updater {
    /// Replace the value, creating the entry if absent.
    Set(Value),
    /// Swap the element of the array at `list_field` whose `id_field` equals
    /// `id`. Leaves the cache untouched when the list is not cached or does
    /// not contain the element.
    ReplaceInList {
        list_field: String,
        id_field: String,
        id: String,
        item: Value,
    },
}

impl Updater {
    /// Evaluate against the current value. `None` means "leave as is".
    #[must_use]
    pub fn apply(&self, current: Option<&Value>) -> Option<Value> {
        match self {
            Self::Set(value) => Some(value.clone()),
            Self::ReplaceInList {
                list_field,
                id_field,
                id,
                item,
            } => {
                let mut next = current?.clone();
                let list = next.get_mut(list_field.as_str())?.as_array_mut()?;
                let slot = list.iter_mut().find(|entry| {
                    entry.get(id_field.as_str()).and_then(Value::as_str) == Some(id.as_str())
                })?;
                *slot = item.clone();
                Some(next)
            }
        }
    }

    /// Whether the result is a complete server response rather than a patch
    /// of the cached value. Only complete responses make an entry fresh.
    #[must_use]
    pub const fn replaces_value(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::ReplaceInList { .. } => "replace in list",
        }
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;

type Generator<T> = Box<dyn FnMut(usize) -> T + Send>;

/// Inputs fed to the workers, one per index
///
/// Each input is produced at most once, when its index is dispatched.
pub enum TaskSource<T> {
    /// Precomputed inputs, moved out as they are dispatched
    Items(Vec<Option<T>>),
    /// Inputs computed on demand from their index
    Lazy { count: usize, generator: Generator<T> },
}

impl<T> TaskSource<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        TaskSource::Items(items.into_iter().map(Some).collect())
    }

    pub fn lazy<F>(count: usize, generator: F) -> Self
    where
        F: FnMut(usize) -> T + Send + 'static,
    {
        TaskSource::Lazy {
            count,
            generator: Box::new(generator),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TaskSource::Items(items) => items.len(),
            TaskSource::Lazy { count, .. } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produces the input for `index`; `None` if out of bounds or already taken
    pub fn take(&mut self, index: usize) -> Option<T> {
        match self {
            TaskSource::Items(items) => items.get_mut(index).and_then(Option::take),
            TaskSource::Lazy { count, generator } => {
                (index < *count).then(|| generator(index))
            }
        }
    }
}

impl<T> From<Vec<T>> for TaskSource<T> {
    fn from(items: Vec<T>) -> Self {
        TaskSource::from_items(items)
    }
}

impl<T> fmt::Debug for TaskSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSource::Items(items) => f
                .debug_struct("Items")
                .field("len", &items.len())
                .finish(),
            TaskSource::Lazy { count, .. } => {
                f.debug_struct("Lazy").field("count", count).finish()
            }
        }
    }
}

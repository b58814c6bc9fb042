// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{BackendError, SchedulerError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

type Reducer<U, V> = Box<dyn Fn(U, Option<V>) -> V + Send>;

/// Folds every slot's outputs into one aggregate per slot
/// Remembers the first backend failure for the async results path
pub struct ResultAggregator<U, V> {
    reducer: Reducer<U, V>,
    aggregates: Vec<Option<V>>,
    failure: Option<SchedulerError>,
}

impl<U, V> ResultAggregator<U, V> {
    pub fn new<R>(slot_count: usize, reducer: R) -> Self
    where
        R: Fn(U, Option<V>) -> V + Send + 'static,
    {
        Self {
            reducer: Box::new(reducer),
            aggregates: std::iter::repeat_with(|| None).take(slot_count).collect(),
            failure: None,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.aggregates.len()
    }

    /// Combines `item` with the slot's current aggregate
    ///
    /// A panicking reducer leaves the previous aggregate in place and is
    /// reported as an error.
    pub fn fold(&mut self, slot_id: usize, item: U) -> Result<(), BackendError>
    where
        V: Clone,
    {
        let Some(aggregate) = self.aggregates.get_mut(slot_id) else {
            return Ok(());
        };

        let acc = aggregate.clone();
        let reducer = &self.reducer;
        match panic::catch_unwind(AssertUnwindSafe(|| reducer(item, acc))) {
            Ok(next) => {
                *aggregate = Some(next);
                Ok(())
            }
            Err(payload) => Err(BackendError::new(format!(
                "reducer for slot {} panicked: {}",
                slot_id,
                panic_message(payload.as_ref())
            ))),
        }
    }

    pub fn aggregate(&self, slot_id: usize) -> Option<&V> {
        self.aggregates.get(slot_id).and_then(Option::as_ref)
    }

    /// Keeps the first failure; later ones are dropped
    pub fn record_failure(&mut self, failure: SchedulerError) -> bool {
        if self.failure.is_some() {
            return false;
        }
        self.failure = Some(failure);
        true
    }

    pub fn failure(&self) -> Option<&SchedulerError> {
        self.failure.as_ref()
    }

    pub fn snapshot(&self) -> Vec<Option<V>>
    where
        V: Clone,
    {
        self.aggregates.clone()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append(item: u32, acc: Option<Vec<u32>>) -> Vec<u32> {
        let mut acc = acc.unwrap_or_default();
        acc.push(item);
        acc
    }

    #[test]
    fn folds_per_slot_in_call_order() {
        let mut aggregator = ResultAggregator::new(3, append);
        aggregator.fold(0, 1).unwrap();
        aggregator.fold(2, 7).unwrap();
        aggregator.fold(0, 2).unwrap();

        assert_eq!(
            aggregator.snapshot(),
            vec![Some(vec![1, 2]), None, Some(vec![7])]
        );
        assert_eq!(aggregator.aggregate(1), None);
    }

    #[test]
    fn reducer_sees_missing_accumulator_first() {
        let mut aggregator = ResultAggregator::new(1, |item: u64, acc: Option<u64>| match acc {
            None => item * 100,
            Some(acc) => acc + item,
        });
        aggregator.fold(0, 1).unwrap();
        aggregator.fold(0, 5).unwrap();
        assert_eq!(aggregator.aggregate(0), Some(&105));
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut aggregator = ResultAggregator::new(1, append);
        assert!(aggregator.fold(4, 1).is_ok());
        assert_eq!(aggregator.snapshot(), vec![None]);
    }

    #[test]
    fn panicking_reducer_keeps_previous_aggregate() {
        let mut aggregator = ResultAggregator::new(1, |item: u32, acc: Option<Vec<u32>>| {
            if item == 1 {
                panic!("cannot fold {}", item);
            }
            append(item, acc)
        });
        aggregator.fold(0, 0).unwrap();

        let error = aggregator.fold(0, 1).unwrap_err();
        assert_eq!(error.message(), "reducer for slot 0 panicked: cannot fold 1");
        assert_eq!(aggregator.snapshot(), vec![Some(vec![0])]);

        aggregator.fold(0, 2).unwrap();
        assert_eq!(aggregator.snapshot(), vec![Some(vec![0, 2])]);
    }

    #[test]
    fn first_failure_wins() {
        let mut aggregator: ResultAggregator<u32, Vec<u32>> = ResultAggregator::new(2, append);
        let first = SchedulerError::BackendFailure {
            slot_id: 1,
            index: 3,
            source: BackendError::new("boom"),
        };
        assert!(aggregator.record_failure(first.clone()));
        assert!(!aggregator.record_failure(SchedulerError::Terminated));
        assert_eq!(aggregator.failure(), Some(&first));
    }
}

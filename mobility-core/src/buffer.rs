//! Fixed-Capacity Ring Accumulator with a Running Sum
//!
//! ## Overview
//!
//! The step counter keeps a sliding window of accelerometer magnitudes and
//! needs the window's mean on every sample. Re-summing 30-60 samples at
//! 50-200 Hz is wasteful, so this buffer maintains the sum incrementally:
//! every push adds the item's contribution and every pop removes it.
//!
//! ```text
//! push(x) ──► ┌────┬────┬────┬────┐ ──► pop() -> oldest
//!             │ t3 │ t4 │ t5 │ t6 │
//!             └────┴────┴────┴────┘
//!              peek()          head()
//!
//! sum == contribution(t3) + ... + contribution(t6)   (always)
//! ```
//!
//! ## Contribution Policy
//!
//! What an item contributes to the sum is decided by a [`SumPolicy`]
//! supplied at construction, not by the item itself. The same container can
//! therefore back a plain sum of values, a sum of squares, or a weighted sum
//! without wrapping the items.
//!
//! ## Overflow and Underflow
//!
//! Unlike a sensor history buffer, this container never overwrites. The
//! caller owns eviction (the moving average evicts by age), so pushing into
//! a full buffer or popping an empty one is a caller bug and reported as
//! [`MobilityError::Overflow`] / [`MobilityError::Underflow`]. A failed
//! operation leaves contents and sum untouched.
//!
//! ## Usage Example
//!
//! ```rust
//! use mobility_core::buffer::{RingAccumulator, TimedValue, ValueSum};
//!
//! let mut window: RingAccumulator<TimedValue, ValueSum, 4> = RingAccumulator::new(ValueSum);
//! window.push(TimedValue { time: 0, value: 9.0 }).unwrap();
//! window.push(TimedValue { time: 10, value: 11.0 }).unwrap();
//! assert_eq!(window.sum(), 20.0);
//!
//! window.pop().unwrap();
//! assert_eq!(window.sum(), 11.0);
//! ```

use heapless::Deque;

use crate::errors::{MobilityError, MobilityResult};
use crate::time::SampleTime;

/// How an item contributes to the accumulator's running sum
///
/// `subtract_from_sum` must exactly undo `add_to_sum` for the same item,
/// otherwise the sum invariant drifts.
pub trait SumPolicy<T> {
    /// Sum after adding `item`'s contribution
    fn add_to_sum(&self, item: &T, sum: f64) -> f64;

    /// Sum after removing `item`'s contribution
    fn subtract_from_sum(&self, item: &T, sum: f64) -> f64;
}

/// A scalar sample stamped with sensor time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedValue {
    /// Sensor timestamp in nanoseconds
    pub time: SampleTime,
    /// Sample value
    pub value: f32,
}

/// Sums the `value` of each [`TimedValue`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSum;

impl SumPolicy<TimedValue> for ValueSum {
    fn add_to_sum(&self, item: &TimedValue, sum: f64) -> f64 {
        sum + item.value as f64
    }

    fn subtract_from_sum(&self, item: &TimedValue, sum: f64) -> f64 {
        sum - item.value as f64
    }
}

/// Fixed-capacity FIFO with an O(1) maintained sum
///
/// ## Type Parameters
///
/// - `T`: stored item
/// - `P`: contribution policy
/// - `N`: capacity, fixed at compile time
///
/// ## Invariants
///
/// - `size() <= N`
/// - `sum()` equals the policy-sum of exactly the buffered items
#[derive(Debug, Clone)]
pub struct RingAccumulator<T, P, const N: usize> {
    items: Deque<T, N>,
    sum: f64,
    policy: P,
}

impl<T, P: SumPolicy<T>, const N: usize> RingAccumulator<T, P, N> {
    /// Creates an empty accumulator using `policy` for contributions
    pub fn new(policy: P) -> Self {
        Self {
            items: Deque::new(),
            sum: 0.0,
            policy,
        }
    }

    /// Appends `item` as the newest element
    ///
    /// Fails with `Overflow` if the buffer already holds `N` items.
    pub fn push(&mut self, item: T) -> MobilityResult<()> {
        if self.items.is_full() {
            return Err(MobilityError::Overflow { capacity: N });
        }

        let sum = self.policy.add_to_sum(&item, self.sum);
        self.items
            .push_back(item)
            .map_err(|_| MobilityError::Overflow { capacity: N })?;
        self.sum = sum;
        Ok(())
    }

    /// Removes and returns the oldest element
    pub fn pop(&mut self) -> MobilityResult<T> {
        let item = self.items.pop_front().ok_or(MobilityError::Underflow)?;
        self.sum = self.policy.subtract_from_sum(&item, self.sum);
        Ok(item)
    }

    /// Oldest element, without removing it
    pub fn peek(&self) -> MobilityResult<&T> {
        self.items.front().ok_or(MobilityError::Underflow)
    }

    /// Most recently pushed element
    pub fn head(&self) -> MobilityResult<&T> {
        self.items.back().ok_or(MobilityError::Underflow)
    }

    /// Number of buffered items
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    /// Fixed capacity `N`
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Running sum of the buffered items' contributions
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Drop every item and reset the sum
    pub fn clear(&mut self) {
        self.items.clear();
        self.sum = 0.0;
    }
}

impl<T, P: SumPolicy<T> + Default, const N: usize> Default for RingAccumulator<T, P, N> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

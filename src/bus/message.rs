//! Message Tuples
//!
//! A message is an ordered, heterogeneous tuple of values, opaque to the bus.
//! It is published atomically as one unit and never split or reordered in
//! transit. Values are `Arc`-wrapped so fan-out to multiple queues shares the
//! same allocations.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::bus::error::{BusError, BusResult};

type Value = Arc<dyn Any + Send + Sync>;

/// Ordered, heterogeneous tuple of values published under a topic.
///
/// # Example
///
/// ```rust
/// use modhost::bus::api::Message;
///
/// let message = Message::new().push(42u32).push("refresh".to_string());
/// assert_eq!(message.value::<u32>(0), Some(&42));
/// assert_eq!(message.value::<String>(1).map(String::as_str), Some("refresh"));
/// ```
#[derive(Clone, Default)]
pub struct Message {
    values: Vec<Value>,
}

impl Message {
    /// Empty tuple; extend it with [`push`](Self::push).
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Single-element tuple shorthand.
    pub fn of<T: Any + Send + Sync>(value: T) -> Self {
        Self::new().push(value)
    }

    /// Append one tuple element, builder style.
    pub fn push<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.values.push(Arc::new(value));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed access to one tuple element.
    ///
    /// Returns `None` when the index is out of range or the element holds a
    /// different type.
    pub fn value<T: Any + Send + Sync>(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(|v| v.downcast_ref::<T>())
    }

    /// Typed access that surfaces a decode failure as a dispatch-time error.
    ///
    /// Handlers use this to fail fast on a malformed tuple; the error is
    /// scoped to the single message being dispatched.
    pub fn expect_value<T: Any + Send + Sync>(&self, index: usize) -> BusResult<&T> {
        self.value(index).ok_or(BusError::ValueMismatch {
            index,
            expected: type_name::<T>(),
        })
    }

    /// Tuple with the first element removed. The remaining values keep
    /// sharing their allocations with the original.
    pub(crate) fn tail(&self) -> Self {
        Self {
            values: self.values.iter().skip(1).cloned().collect(),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let message = Message::new().push(1u64).push("two".to_string());

        assert_eq!(message.len(), 2);
        assert_eq!(message.value::<u64>(0), Some(&1));
        assert_eq!(message.value::<String>(1).map(String::as_str), Some("two"));

        // Wrong type and out-of-range both miss
        assert_eq!(message.value::<i32>(0), None);
        assert_eq!(message.value::<u64>(5), None);
    }

    #[test]
    fn test_expect_value_reports_index_and_type() {
        let message = Message::of(1u8);

        let err = message.expect_value::<String>(0).unwrap_err();
        match err {
            BusError::ValueMismatch { index, expected } => {
                assert_eq!(index, 0);
                assert!(expected.contains("String"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_tail_drops_first_element_only() {
        let message = Message::new().push(1u8).push(2u16).push(3u32);
        let tail = message.tail();

        assert_eq!(tail.len(), 2);
        assert_eq!(tail.value::<u16>(0), Some(&2));
        assert_eq!(tail.value::<u32>(1), Some(&3));
    }

    #[test]
    fn test_empty_message() {
        let message = Message::new();
        assert!(message.is_empty());
        assert!(message.tail().is_empty());
    }
}

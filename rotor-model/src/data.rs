//! Wheel contents and the selection handed back to hosts.

use std::borrow::Cow;
use std::ops::Index;

use crate::error::{ModelError, Result};

/// Ordered, non-empty list of wheel items.
///
/// Emptiness is rejected at construction so every consumer can rely on
/// `len() >= 1` when folding virtual positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataSet<T> {
    items: Vec<T>,
}

impl<T> DataSet<T> {
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(ModelError::EmptyDataSet);
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> &T {
        &self.items[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> TryFrom<Vec<T>> for DataSet<T> {
    type Error = ModelError;

    fn try_from(items: Vec<T>) -> Result<Self> {
        DataSet::new(items)
    }
}

impl<T> Index<usize> for DataSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a DataSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for DataSet<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        DataSet::new(items).map_err(serde::de::Error::custom)
    }
}

/// A logical index paired with the item stored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<T> {
    pub index: usize,
    pub item: T,
}

impl<T> Selection<T> {
    pub fn new(index: usize, item: T) -> Self {
        Self { index, item }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Selection<U> {
        Selection {
            index: self.index,
            item: f(self.item),
        }
    }
}

impl<T: Clone> Selection<&T> {
    pub fn cloned(self) -> Selection<T> {
        self.map(Clone::clone)
    }
}

/// Items that can drive a join cascade.
///
/// A primary wheel looks up the dependent's replacement data by the join key
/// of the item it just committed.
pub trait JoinKey {
    fn join_key(&self) -> Cow<'_, str>;
}

impl JoinKey for String {
    fn join_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl JoinKey for &str {
    fn join_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl JoinKey for Cow<'_, str> {
    fn join_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

macro_rules! join_key_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl JoinKey for $ty {
                fn join_key(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

join_key_via_display!(u8, u16, u32, u64, usize, i8, i16, i32, i64, char);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_set_is_rejected() {
        assert_eq!(
            DataSet::<u8>::new(Vec::new()),
            Err(ModelError::EmptyDataSet)
        );
    }

    #[test]
    fn data_set_indexing() {
        let data = DataSet::new(vec!["am", "pm"]).expect("non-empty");
        assert_eq!(data.len(), 2);
        assert_eq!(data[1], "pm");
        assert_eq!(data.get(2), None);
        assert_eq!(*data.first(), "am");
    }

    #[test]
    fn join_keys() {
        assert_eq!(String::from("AM").join_key(), "AM");
        assert_eq!(7u32.join_key(), "7");
        assert_eq!('x'.join_key(), "x");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializing_empty_data_set_fails() {
        assert!(serde_json::from_str::<DataSet<u8>>("[]").is_err());
        let data: DataSet<u8> =
            serde_json::from_str("[1, 2, 3]").expect("data set");
        assert_eq!(data.len(), 3);
    }
}

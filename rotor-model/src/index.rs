/// Unbounded scroll position used by looping wheels.
///
/// A looping host list advertises far more rows than the data set holds and
/// the engine folds every row back into `[0, N)`. The value can sit anywhere
/// in `i64`; only its residue modulo `N` carries meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualIndex(pub i64);

impl VirtualIndex {
    pub const ZERO: VirtualIndex = VirtualIndex(0);

    pub fn new(value: i64) -> Self {
        VirtualIndex(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Shift by a signed number of rows, saturating at the `i64` bounds.
    pub fn offset(&self, rows: i64) -> Self {
        VirtualIndex(self.0.saturating_add(rows))
    }
}

impl std::fmt::Display for VirtualIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for VirtualIndex {
    fn from(value: i64) -> Self {
        VirtualIndex(value)
    }
}

impl From<usize> for VirtualIndex {
    fn from(value: usize) -> Self {
        VirtualIndex(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

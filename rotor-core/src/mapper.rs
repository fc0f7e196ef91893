//! Logical ↔ virtual position mapping.
//!
//! A looping wheel asks the host to advertise [`VIRTUAL_ITEM_COUNT`] rows and
//! starts scrolled to a base far from row zero, so neither end is reachable
//! by hand. Every host row folds back into the data set with a Euclidean
//! remainder. A finite wheel maps rows one to one, with `half` blank rows of
//! padding above the first item and below the last so both ends can reach
//! the center.

use rotor_model::{VirtualIndex, WindowSize};

use crate::error::{Result, WheelError};

/// Row count a looping host list advertises.
pub const VIRTUAL_ITEM_COUNT: i64 = i32::MAX as i64;

/// Virtual index equivalent to logical 0, placed near the middle of the
/// advertised range.
pub fn virtual_base(len: usize) -> Result<VirtualIndex> {
    let n = checked_len(len)?;
    let k = VIRTUAL_ITEM_COUNT / 2 / n;
    Ok(VirtualIndex(k * n))
}

/// Fold any virtual index into `[0, len)`.
pub fn to_logical(index: VirtualIndex, len: usize) -> Result<usize> {
    let n = checked_len(len)?;
    Ok(index.0.rem_euclid(n) as usize)
}

fn checked_len(len: usize) -> Result<i64> {
    if len == 0 {
        return Err(WheelError::InvalidDataSet(
            "cannot map positions over an empty data set".to_string(),
        ));
    }
    i64::try_from(len).map_err(|_| {
        WheelError::InvalidDataSet(format!("data set too large: {len}"))
    })
}

/// Host-row geometry for one wheel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMapper {
    window: WindowSize,
    looping: bool,
}

impl PositionMapper {
    pub fn new(window: WindowSize, looping: bool) -> Self {
        Self { window, looping }
    }

    pub fn window(&self) -> WindowSize {
        self.window
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn half(&self) -> i64 {
        self.window.half() as i64
    }

    /// Blank rows the host places before the first item.
    pub fn padding(&self) -> i64 {
        if self.looping { 0 } else { self.half() }
    }

    /// Number of rows the host list must advertise for `len` items.
    pub fn host_item_count(&self, len: usize) -> Result<i64> {
        let n = checked_len(len)?;
        if self.looping {
            Ok(VIRTUAL_ITEM_COUNT)
        } else {
            Ok(n + 2 * self.half())
        }
    }

    /// Host row sitting at the center when `first` is the top row.
    pub fn center_slot(&self, first: VirtualIndex) -> VirtualIndex {
        first.offset(self.half())
    }

    /// Logical index shown by a host row.
    ///
    /// Padding rows of a finite wheel clamp to the nearest real item.
    pub fn logical_at(&self, slot: VirtualIndex, len: usize) -> Result<usize> {
        if self.looping {
            return to_logical(slot, len);
        }
        let n = checked_len(len)?;
        let index = slot.0.saturating_sub(self.padding()).clamp(0, n - 1);
        Ok(index as usize)
    }

    /// Logical index at the center of the window whose top row is `first`.
    pub fn logical_at_center(
        &self,
        first: VirtualIndex,
        len: usize,
    ) -> Result<usize> {
        self.logical_at(self.center_slot(first), len)
    }

    /// Top row that puts `logical` at the center of the window.
    pub fn first_visible_for(
        &self,
        logical: usize,
        len: usize,
    ) -> Result<VirtualIndex> {
        let n = checked_len(len)?;
        let logical = (logical as i64).min(n - 1);
        if self.looping {
            Ok(virtual_base(len)?.offset(logical - self.half()))
        } else {
            Ok(VirtualIndex(logical))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(size: usize) -> WindowSize {
        WindowSize::new(size).expect("odd window")
    }

    #[test]
    fn empty_length_is_rejected() {
        assert!(matches!(
            virtual_base(0),
            Err(WheelError::InvalidDataSet(_))
        ));
        assert!(matches!(
            to_logical(VirtualIndex(3), 0),
            Err(WheelError::InvalidDataSet(_))
        ));
    }

    #[test]
    fn virtual_base_round_trips_for_all_offsets() {
        for n in 1..=97usize {
            let base = virtual_base(n).expect("base");
            assert_eq!(to_logical(base, n).expect("logical"), 0);
            for k in (-5_000i64..5_000).step_by(7) {
                let logical = to_logical(base.offset(k), n).expect("logical");
                assert_eq!(logical as i64, k.rem_euclid(n as i64), "n={n} k={k}");
            }
        }
    }

    #[test]
    fn virtual_base_stays_inside_advertised_range() {
        for n in [1usize, 2, 7, 24, 60, 1_000_003] {
            let base = virtual_base(n).expect("base").value();
            assert!(base > 0 && base < VIRTUAL_ITEM_COUNT, "n={n}");
            assert_eq!(base % n as i64, 0);
        }
    }

    #[test]
    fn negative_virtual_indices_fold_forward() {
        assert_eq!(to_logical(VirtualIndex(-1), 60).expect("logical"), 59);
        assert_eq!(to_logical(VirtualIndex(-60), 60).expect("logical"), 0);
    }

    #[test]
    fn finite_mapping_is_clamped_identity() {
        let mapper = PositionMapper::new(window(5), false);
        assert_eq!(mapper.padding(), 2);
        // top row 0 shows two padding rows then item 0 at the center
        assert_eq!(mapper.logical_at_center(VirtualIndex(0), 10).expect("idx"), 0);
        assert_eq!(mapper.logical_at_center(VirtualIndex(4), 10).expect("idx"), 4);
        assert_eq!(mapper.logical_at_center(VirtualIndex(42), 10).expect("idx"), 9);
        assert_eq!(mapper.logical_at(VirtualIndex(-8), 10).expect("idx"), 0);
        assert_eq!(mapper.host_item_count(10).expect("count"), 14);
    }

    #[test]
    fn looping_center_includes_window_half() {
        let mapper = PositionMapper::new(window(5), true);
        let base = virtual_base(60).expect("base");
        assert_eq!(mapper.logical_at_center(base, 60).expect("idx"), 2);
        assert_eq!(
            mapper.logical_at_center(base.offset(58), 60).expect("idx"),
            0
        );
    }

    #[test]
    fn first_visible_for_inverts_center_mapping() {
        for looping in [false, true] {
            let mapper = PositionMapper::new(window(5), looping);
            for logical in 0..24 {
                let first = mapper.first_visible_for(logical, 24).expect("first");
                assert_eq!(
                    mapper.logical_at_center(first, 24).expect("idx"),
                    logical,
                    "looping={looping}"
                );
            }
        }
    }

    #[test]
    fn first_visible_for_clamps_out_of_range_requests() {
        let mapper = PositionMapper::new(window(3), false);
        assert_eq!(
            mapper.first_visible_for(99, 4).expect("first"),
            VirtualIndex(3)
        );
    }
}

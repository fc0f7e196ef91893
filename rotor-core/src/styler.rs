//! Per-row render attributes as a function of distance from the center.

use rotor_model::{Color, VirtualIndex, WheelStyle};

/// Render attributes for one visible row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub color: Color,
    /// Absolute text size.
    pub text_size: f32,
    /// Scale relative to the centered row (1.0 at the center).
    pub text_scale: f32,
    /// Row opacity in `[0, 1]`.
    pub alpha: f32,
}

/// Style for the host row `slot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotStyle {
    pub slot: VirtualIndex,
    pub style: ItemStyle,
}

/// Style for the row at `position` when `center` is selected.
pub fn style(
    position: VirtualIndex,
    center: VirtualIndex,
    wheel: &WheelStyle,
) -> ItemStyle {
    let distance = position.0.abs_diff(center.0);
    if distance == 0 {
        return ItemStyle {
            color: wheel.selected_text_color,
            text_size: wheel.text_size * wheel.selected_text_zoom,
            text_scale: 1.0,
            alpha: 1.0,
        };
    }
    let exponent = i32::try_from(distance).unwrap_or(i32::MAX);
    ItemStyle {
        color: wheel.text_color,
        text_size: wheel.text_size,
        text_scale: wheel.off_center_scale,
        alpha: wheel.text_alpha.powi(exponent),
    }
}

/// Styles for every row within `half` rows of `center`, top to bottom.
pub fn style_window(
    center: VirtualIndex,
    half: i64,
    wheel: &WheelStyle,
) -> Vec<SlotStyle> {
    (-half..=half)
        .map(|delta| {
            let slot = center.offset(delta);
            SlotStyle {
                slot,
                style: style(slot, center, wheel),
            }
        })
        .collect()
}

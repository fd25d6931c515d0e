//! Dock layout
//!
//! The dock has no persisted layout state: dimensions and slot positions are
//! recomputed from the button count whenever a button or menu is added.

use crate::components::Button;

/// Space between the outermost buttons and the plate edge
pub const PADDING: f32 = 1.2;
/// Space between neighbouring buttons
pub const GAP: f32 = 1.5;
/// Plate thickness
pub const DEPTH: f32 = 0.25;

/// Plate dimensions and button slot positions for one button count
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DockLayout {
    /// Plate width
    pub width: f32,
    /// Plate height
    pub height: f32,
    /// Horizontal centre of each slot, left to right
    pub slots: Vec<f32>,
}

impl DockLayout {
    /// Lay out `count` buttons.
    pub fn compute(count: usize) -> Self {
        let w = Button::WIDTH;
        let height = Button::HEIGHT + PADDING * 2.0;
        if count == 0 {
            return Self {
                width: PADDING * 2.0,
                height,
                slots: Vec::new(),
            };
        }

        let n = count as f32;
        let content = n * w + (n - 1.0) * GAP;
        let min = -content / 2.0;
        let slots = (0..count)
            .map(|i| min + (content / n) * i as f32 + ((n - 1.0) * GAP) / n / 2.0 + w / 2.0)
            .collect();

        Self {
            width: content + PADDING * 2.0,
            height,
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dock_is_just_padding() {
        let layout = DockLayout::compute(0);
        assert_eq!(layout.width, 2.4);
        assert!((layout.height - 9.4).abs() < 1e-5);
        assert!(layout.slots.is_empty());
    }

    #[test]
    fn single_button_is_centred() {
        let layout = DockLayout::compute(1);
        assert!((layout.width - 9.4).abs() < 1e-5);
        assert_eq!(layout.slots.len(), 1);
        assert!(layout.slots[0].abs() < 1e-5);
    }

    #[test]
    fn slots_are_symmetric_with_even_pitch() {
        let layout = DockLayout::compute(5);
        assert!((layout.width - (5.0 * 7.0 + 4.0 * 1.5 + 2.4)).abs() < 1e-4);
        for i in 0..5 {
            assert!((layout.slots[i] + layout.slots[4 - i]).abs() < 1e-4);
        }
        // Pitch is content width over count, slightly under width + gap.
        for pair in layout.slots.windows(2) {
            assert!((pair[1] - pair[0] - 8.2).abs() < 1e-4);
        }
    }
}

//! Card strip geometry.
//!
//! Cards are laid out left to right in sorted order:
//!
//! ```text
//! | inset | card 0 | spacing | card 1 | spacing | ... | card n-1 | inset |
//! ```
//!
//! All positions are in content coordinates, where 0 is the left edge of the
//! strip's content regardless of scroll position.

/// Width of one POI card.
pub const DEFAULT_CARD_WIDTH: f64 = 280.0;

/// Gap between adjacent cards.
pub const DEFAULT_CARD_SPACING: f64 = 10.0;

/// Horizontal card strip layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub card_width: f64,
    pub spacing: f64,
    /// Space before the first and after the last card.
    pub inset: f64,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            card_width: DEFAULT_CARD_WIDTH,
            spacing: DEFAULT_CARD_SPACING,
            inset: 0.0,
        }
    }
}

impl CardLayout {
    pub fn new(card_width: f64, spacing: f64, inset: f64) -> Self {
        Self {
            card_width,
            spacing,
            inset,
        }
    }

    fn stride(&self) -> f64 {
        self.card_width + self.spacing
    }

    /// Left edge of the card at `index`.
    pub fn item_start(&self, index: usize) -> f64 {
        self.inset + index as f64 * self.stride()
    }

    pub fn item_center(&self, index: usize) -> f64 {
        self.item_start(index) + self.card_width / 2.0
    }

    /// Total content width for `count` cards.
    pub fn content_width(&self, count: usize) -> f64 {
        if count == 0 {
            return 2.0 * self.inset;
        }
        2.0 * self.inset + count as f64 * self.card_width + (count - 1) as f64 * self.spacing
    }

    /// The card whose frame contains `x`, if any.
    ///
    /// Points in the spacing between cards, in the insets, or past the last
    /// card hit nothing. Frames are half-open: a card's right edge belongs to
    /// the gap.
    pub fn item_at(&self, x: f64, count: usize) -> Option<usize> {
        if !x.is_finite() || x < self.inset || self.stride() <= 0.0 {
            return None;
        }
        let relative = x - self.inset;
        let index = (relative / self.stride()).floor() as usize;
        let within = relative - index as f64 * self.stride();
        (index < count && within < self.card_width).then_some(index)
    }

    /// Content offset that centres the card at `index` in a viewport of
    /// `viewport_width`.
    pub fn offset_for_item(&self, index: usize, viewport_width: f64) -> f64 {
        self.item_center(index) - viewport_width / 2.0
    }

    /// Snap a proposed resting offset so a card ends up centred.
    ///
    /// The chosen card is the one whose centre would be closest to the
    /// viewport centre at `proposed`; on a tie the leftmost wins. The result
    /// is rounded to whole points. With no cards the proposal is returned
    /// unchanged.
    pub fn target_content_offset(&self, proposed: f64, viewport_width: f64, count: usize) -> f64 {
        let half = viewport_width / 2.0;
        let proposed_center = proposed + half;

        let nearest = (0..count).min_by(|&a, &b| {
            let da = (self.item_center(a) - proposed_center).abs();
            let db = (self.item_center(b) - proposed_center).abs();
            da.total_cmp(&db)
        });

        match nearest {
            Some(index) => (self.item_center(index) - half).round(),
            None => proposed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CardLayout {
        CardLayout::new(100.0, 10.0, 20.0)
    }

    #[test]
    fn test_item_geometry() {
        let l = layout();
        assert_eq!(l.item_start(0), 20.0);
        assert_eq!(l.item_start(2), 240.0);
        assert_eq!(l.item_center(1), 180.0);
        assert_eq!(l.content_width(3), 360.0);
        assert_eq!(l.content_width(0), 40.0);
    }

    #[test]
    fn test_item_at_hits_and_misses() {
        let l = layout();
        assert_eq!(l.item_at(10.0, 3), None);
        assert_eq!(l.item_at(20.0, 3), Some(0));
        assert_eq!(l.item_at(119.9, 3), Some(0));
        assert_eq!(l.item_at(120.0, 3), None);
        assert_eq!(l.item_at(125.0, 3), None);
        assert_eq!(l.item_at(130.0, 3), Some(1));
        assert_eq!(l.item_at(300.0, 3), Some(2));
        assert_eq!(l.item_at(400.0, 3), None);
        assert_eq!(l.item_at(f64::NAN, 3), None);
    }

    #[test]
    fn test_offset_for_item_centres_card() {
        let l = layout();
        let offset = l.offset_for_item(2, 300.0);
        assert_eq!(l.item_at(offset + 150.0, 3), Some(2));
        assert_eq!(offset + 150.0, l.item_center(2));
    }

    #[test]
    fn test_target_content_offset_snaps_to_nearest_card() {
        let l = layout();
        // Viewport centre at 170 lands nearest card 1 (centre 180).
        assert_eq!(l.target_content_offset(20.0, 300.0, 3), 30.0);
        // Far past the end snaps back to the last card.
        assert_eq!(l.target_content_offset(5000.0, 300.0, 3), 140.0);
        assert_eq!(l.target_content_offset(12.5, 300.0, 0), 12.5);
    }

    #[test]
    fn test_target_content_offset_tie_prefers_left() {
        let l = layout();
        // Centre exactly between card 0 (70) and card 1 (180).
        let proposed = 125.0 - 150.0;
        assert_eq!(l.target_content_offset(proposed, 300.0, 2), -80.0);
    }
}

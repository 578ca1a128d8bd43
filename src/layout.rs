//! Page layout calculations

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Create a length from points (1/72 inch)
    pub fn from_pt(pt: f64) -> Self {
        Length(pt * 25.4 / 72.0)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_mm(215.9),
            height: Length::from_mm(279.4),
        }
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }
}

/// Where an image lands on its page, in points from the bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedImage {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Fit an image of natural size `(natural_w, natural_h)` points onto `page`
/// inside a uniform margin, centered.
///
/// - Images larger than the usable area are scaled down to fit.
/// - Smaller images may be scaled up, capped at `max_upscale` and never
///   beyond the usable area.
/// - A margin so large it leaves no usable area is ignored.
pub fn fit_image(
    page: &PageDimensions,
    margin: Length,
    natural_w: f64,
    natural_h: f64,
    max_upscale: f64,
) -> PlacedImage {
    let page_w = page.width.pt();
    let page_h = page.height.pt();

    let mut margin_pt = margin.pt().max(0.0);
    let mut inner_w = page_w - 2.0 * margin_pt;
    let mut inner_h = page_h - 2.0 * margin_pt;
    if inner_w <= 0.0 || inner_h <= 0.0 {
        inner_w = page_w;
        inner_h = page_h;
        margin_pt = 0.0;
    }

    let scale_to_fit = (inner_w / natural_w).min(inner_h / natural_h);
    let scale = if scale_to_fit < 1.0 {
        scale_to_fit
    } else {
        scale_to_fit.min(max_upscale)
    };

    let width = natural_w * scale;
    let height = natural_h * scale;
    let x = margin_pt + (inner_w - width) / 2.0;
    let y = margin_pt + (inner_h - height) / 2.0;

    PlacedImage {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let len = Length::from_inches(1.0);
        assert!((len.mm() - 25.4).abs() < 0.01);
        assert!((len.pt() - 72.0).abs() < 0.01);

        let pt = Length::from_pt(36.0);
        assert!((pt.pt() - 36.0).abs() < 0.01);
    }

    #[test]
    fn test_letter_size() {
        let letter = PageDimensions::letter();
        // 8.5 inches = 215.9 mm
        assert!((letter.width.mm() - 215.9).abs() < 0.1);
        // 11 inches = 279.4 mm
        assert!((letter.height.mm() - 279.4).abs() < 0.1);
    }

    #[test]
    fn test_fit_shrinks_oversized_image() {
        let page = PageDimensions::letter();
        // Twice the page width at natural size
        let placed = fit_image(&page, Length::from_pt(24.0), 1224.0, 100.0, 3.0);

        let inner_w = page.width.pt() - 48.0;
        assert!((placed.width - inner_w).abs() < 0.01);
        // Aspect ratio preserved
        assert!((placed.height - placed.width * 100.0 / 1224.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_caps_upscale() {
        let page = PageDimensions::letter();
        // A tiny image: fitting would blow it up ~28x, cap holds it at 3x
        let placed = fit_image(&page, Length::from_pt(24.0), 20.0, 20.0, 3.0);
        assert!((placed.width - 60.0).abs() < 0.01);
        assert!((placed.height - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_centers_image() {
        let page = PageDimensions::letter();
        let placed = fit_image(&page, Length::from_pt(0.0), 100.0, 100.0, 1.0);
        let page_w = page.width.pt();
        let page_h = page.height.pt();
        assert!((placed.x - (page_w - placed.width) / 2.0).abs() < 0.01);
        assert!((placed.y - (page_h - placed.height) / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_ignores_absurd_margin() {
        let page = PageDimensions::letter();
        // Margin wider than half the page leaves no usable area
        let placed = fit_image(&page, Length::from_pt(400.0), 100.0, 100.0, 1.0);
        assert!(placed.width > 0.0);
        assert!(placed.x >= 0.0 && placed.y >= 0.0);
    }
}

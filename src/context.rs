//! Page context helpers
//!
//! URL-path based page type detection and the scroll depth computation used
//! by the client instrumentation. The full [`PageContext`] snapshot is
//! produced by an external collaborator that reads the DOM; only the
//! deterministic pieces live here.

use crate::types::PageType;

impl PageType {
    /// Detect the page category from a URL path via first-match rules.
    ///
    /// The path is lowercased before matching. Exact matches for the root
    /// forms win first; substring checks follow in fixed order.
    pub fn detect(path: &str) -> Self {
        let path = path.to_lowercase();
        if path == "/" || path == "/index" || path == "/home" {
            return PageType::Homepage;
        }
        if path.contains("product") {
            return PageType::Product;
        }
        if path.contains("cart") {
            return PageType::Cart;
        }
        if path.contains("checkout") {
            return PageType::Checkout;
        }
        if path.contains("contact") {
            return PageType::Contact;
        }
        if path.contains("about") {
            return PageType::About;
        }
        if path.contains("pricing") {
            return PageType::Pricing;
        }
        PageType::Other
    }
}

/// Compute scroll depth as a rounded percentage of the scrollable height.
///
/// Degenerate geometry (page no taller than the viewport) yields 0 rather
/// than a division-by-zero artifact; the result is clamped to 0-100.
pub fn scroll_depth_percent(scroll_y: f64, page_height: f64, viewport_height: f64) -> u8 {
    let scrollable = page_height - viewport_height;
    if scrollable <= 0.0 || !scroll_y.is_finite() {
        return 0;
    }
    let percent = (scroll_y / scrollable * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

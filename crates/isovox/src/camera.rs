//! Camera that follows the player.

use isovox_core::Vec2;

/// Smallest zoom factor.
pub const MIN_ZOOM: f32 = 0.25;
/// Largest zoom factor.
pub const MAX_ZOOM: f32 = 4.0;
/// Zoom change per unit of scroll.
pub const ZOOM_STEP: f32 = 0.1;
/// Zoom a new scene starts with.
pub const DEFAULT_ZOOM: f32 = 0.5;

/// View centre and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Render-space point at the centre of the view.
    pub center: Vec2,
    zoom: f32,
}

impl Camera {
    /// Creates a camera looking at `center`.
    #[must_use]
    pub const fn new(center: Vec2) -> Self {
        Self {
            center,
            zoom: DEFAULT_ZOOM,
        }
    }

    /// Current zoom factor, always within `[MIN_ZOOM, MAX_ZOOM]`.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Moves the view onto `target`.
    pub fn follow(&mut self, target: Vec2) {
        self.center = target;
    }

    /// Applies a scroll delta; scrolling away from the user zooms in.
    pub fn scroll(&mut self, delta: f32) {
        self.set_zoom(self.zoom - delta * ZOOM_STEP);
    }

    /// Sets the zoom, clamped.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

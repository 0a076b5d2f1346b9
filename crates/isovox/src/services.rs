//! # Collaborator Contracts
//!
//! The scene never loads files or talks to a GPU. It reaches assets and
//! the screen only through these two traits; handles are opaque and passed
//! straight back to the surface.

use isovox_core::{Vec2, Vertex};

/// Opaque texture handle issued by an [`AssetProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Opaque font handle issued by an [`AssetProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Looks up loaded assets by name.
pub trait AssetProvider {
    /// Texture registered under `name`.
    fn texture(&self, name: &str) -> Option<TextureHandle>;

    /// Font registered under `name`.
    fn font(&self, name: &str) -> Option<FontHandle>;
}

/// Receives one frame's draw submissions.
pub trait RenderSurface {
    /// Clears the frame.
    fn clear(&mut self, color: Color);

    /// Centres the view on a render-space point.
    fn set_view_center(&mut self, center: Vec2);

    /// Scales the visible area; factors below 1 magnify.
    fn set_view_zoom(&mut self, zoom: f32);

    /// Draws a triangle list, three vertices per triangle.
    fn submit_triangles(&mut self, vertices: &[Vertex], texture: TextureHandle);

    /// Draws a line of text at a render-space position.
    fn submit_text(&mut self, font: FontHandle, text: &str, position: Vec2);
}

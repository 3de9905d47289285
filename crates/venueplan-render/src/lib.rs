//! VenuePlan Render Library
//!
//! Renderer abstraction and implementations for VenuePlan.
//! The SVG renderer composes catalog glyphs into a standalone document.

mod renderer;
mod svg;

pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use svg::SvgRenderer;

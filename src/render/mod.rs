// src/render/mod.rs
// =============================================================================
// The three views of one contributor list.
//
// Submodules:
// - mosaic: circular avatars on a canvas, exported as PNG/WebP
// - json:   the raw records, pretty-printed
// - table:  an HTML avatar table for README files (+ a plain Markdown table)
//
// Each view is a pure function of the contributor slice; none of them keeps
// state between queries.
// =============================================================================

mod json;
pub mod mosaic;
mod table;

pub use json::render_json;
pub use mosaic::{ExportFormat, MosaicLayout, MosaicOptions};
pub use table::{render_markdown_list, render_table};

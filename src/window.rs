//! Procedural stand-in photo of a two-sash window.

pub mod draw;
pub mod geometry;

pub use draw::{render_synthetic_window, sample_data_uri};
pub use geometry::{HandleSide, SashGeometry, WindowGeometry};

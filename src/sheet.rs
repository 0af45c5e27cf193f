//! Side-by-side "before / after" presentation sheet.

pub mod compose;
pub mod layout;

pub use compose::{Compositor, SheetOpts};
pub use layout::{SheetLayout, fit_image};

//! Layout reconstruction from positioned OCR tokens

pub mod reconstructor;

pub use reconstructor::{LayoutReconstructor, ReconstructedLayout};

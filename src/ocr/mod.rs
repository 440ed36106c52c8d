pub mod engine;
pub mod preprocess;
pub mod setup;
pub mod text;

pub use engine::{Tesseract, TextRecognizer};
pub use preprocess::{color_mask, encode_png, prepare, CapturePolicy};
pub use setup::locate_tesseract;
pub use text::{clean_category, clean_title};

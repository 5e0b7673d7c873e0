pub mod cleaner;
pub mod reconstructor;
pub mod subtitle_parser;

pub use cleaner::{clean_paragraph, clean_paragraphs};
pub use reconstructor::reconstruct;
pub use subtitle_parser::parse_subtitle_file;

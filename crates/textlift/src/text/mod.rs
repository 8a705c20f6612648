pub mod normalize;

pub use normalize::normalize_extracted_text;

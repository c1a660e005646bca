//! Resume structuring: normalize, segment, assemble.

mod assemble;
pub mod markup;
mod normalize;
mod options;
pub mod patterns;
mod segment;

pub use assemble::Assembler;
pub use normalize::{indent_level, NormalizedLine, Normalizer};
pub use options::{NormalizeOptions, NormalizePreset, ParseOptions};
pub use patterns::BULLET_MARKER;
pub use segment::Segmenter;

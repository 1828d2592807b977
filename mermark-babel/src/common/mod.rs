//! Conversion logic shared by both formats.
//!
//! The format parsers and serializers are thin: they recognize block
//! boundaries and delegate everything else here.

pub mod entities;
pub mod flat_to_nested;
pub mod inline;
pub mod line_ending;
pub mod nested_to_flat;
pub mod protect;
pub mod scan;
pub mod slug;
pub mod table;

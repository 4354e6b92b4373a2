//! Public library API for decoding Ruby Marshal 4.8 object graphs.

/// Marshal stream decoding, reference tables, and JSON rendering.
pub mod marshal;

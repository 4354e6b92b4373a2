mod bytes;
mod decode;
mod error;
mod json;
mod registry;
pub mod rgss;
mod table;
mod tag;
mod value;

/// Bounds-checked byte cursor, also useful inside dump hooks.
pub use bytes::Cursor;
/// Graph decoding entry points and options.
pub use decode::{DecodeOptions, Decoder};
/// Error and result aliases.
pub use error::{MarshalError, Result};
/// JSON rendering entry point and options.
pub use json::{CYCLE_MARKER, EncodeOptions, encode};
/// Custom-class decode hook registry.
pub use registry::{ClassRegistry, DumpHook};
/// Reference tables assigning encounter-order indices.
pub use table::{ObjectTable, SymbolTable};
/// Wire tag enumeration and tag decoding.
pub use tag::Tag;
/// Decoded graph value, node, and document types.
pub use value::{ClassKind, Document, Node, ObjId, SymId, Value};

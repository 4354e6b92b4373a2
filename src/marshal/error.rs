use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MarshalError>;

/// Errors produced while reading, decoding, and rendering marshal data.
#[derive(Debug, Error)]
pub enum MarshalError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Stream version header is not marshal 4.8.
	#[error("unsupported marshal version {major}.{minor} (expected 4.8)")]
	UnsupportedVersion {
		/// Major version byte.
		major: u8,
		/// Minor version byte.
		minor: u8,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Unrecognized tag byte.
	#[error("unknown tag byte 0x{tag:02x} at offset {at}")]
	UnknownTag {
		/// Offending tag byte.
		tag: u8,
		/// Byte offset of the tag.
		at: usize,
	},
	/// Object back-reference index past the registered entries.
	#[error("dangling object link {index} at offset {at} (only {len} registered)")]
	DanglingObjectRef {
		/// Requested link index.
		index: usize,
		/// Registered entries at the time of the lookup.
		len: usize,
		/// Byte offset of the link.
		at: usize,
	},
	/// Symbol link index past the symbol table.
	#[error("dangling symbol link {index} at offset {at} (only {len} registered)")]
	DanglingSymbolRef {
		/// Requested symlink index.
		index: usize,
		/// Interned symbols at the time of the lookup.
		len: usize,
		/// Byte offset of the symlink.
		at: usize,
	},
	/// Negative packed integer where a length, count, or index is required.
	#[error("negative length {value} at offset {at}")]
	NegativeLength {
		/// Parsed signed value.
		value: i64,
		/// Byte offset of the packed integer.
		at: usize,
	},
	/// Declared element count exceeds the bytes left in the stream.
	#[error("element count {count} at offset {at} exceeds remaining {rem} bytes")]
	LengthOverrunsInput {
		/// Declared element count.
		count: usize,
		/// Bytes left in the stream.
		rem: usize,
		/// Byte offset of the count.
		at: usize,
	},
	/// Decode or encode recursion exceeded the configured limit.
	#[error("recursion depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Input buffer larger than the configured limit.
	#[error("input is {len} bytes, limit is {max}")]
	InputTooLarge {
		/// Input length in bytes.
		len: usize,
		/// Maximum accepted length.
		max: usize,
	},
	/// A symbol was required (class name or field key) but another tag appeared.
	#[error("expected symbol, found tag 0x{tag:02x} at offset {at}")]
	ExpectedSymbol {
		/// Tag byte that appeared instead.
		tag: u8,
		/// Byte offset of the tag.
		at: usize,
	},
	/// Float payload did not parse as a numeric literal.
	#[error("malformed float literal at offset {at}")]
	BadFloatLiteral {
		/// Byte offset of the float payload.
		at: usize,
	},
	/// Bignum magnitude does not fit a 64-bit integer.
	#[error("bignum at offset {at} does not fit in 64 bits")]
	BignumOutOfRange {
		/// Byte offset of the bignum.
		at: usize,
	},
	/// User-defined dump with no registered hook, or an unsupported data object.
	#[error("no decode hook for class {class_name} at offset {at}")]
	UnsupportedDump {
		/// Ruby class name named by the stream.
		class_name: String,
		/// Byte offset of the tag.
		at: usize,
	},
	/// Registered dump hook rejected its payload.
	#[error("dump hook for class {class_name} failed: {message}")]
	DumpHookFailed {
		/// Ruby class name the hook is registered for.
		class_name: String,
		/// Hook-provided failure description.
		message: String,
	},
}

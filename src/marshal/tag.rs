use crate::marshal::bytes::Cursor;
use crate::marshal::{MarshalError, Result};

/// Wire tag identifying the shape of the next encoded value.
///
/// Every stream position is interpreted under exactly one tag before any
/// payload bytes are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
	/// `0` — nil.
	Nil,
	/// `T` — true.
	True,
	/// `F` — false.
	False,
	/// `i` — packed fixnum.
	Fixnum,
	/// `l` — arbitrary-precision integer.
	Bignum,
	/// `f` — float as an ASCII literal.
	Float,
	/// `"` — length-prefixed byte string.
	String,
	/// `:` — length-prefixed symbol name.
	Symbol,
	/// `;` — back-reference into the symbol table.
	SymbolLink,
	/// `[` — array.
	Array,
	/// `{` — hash.
	Hash,
	/// `}` — hash followed by a default value.
	HashWithDefault,
	/// `o` — plain object with instance variables.
	Object,
	/// `S` — struct with named members.
	Struct,
	/// `u` — class `_dump` byte blob.
	UserDefined,
	/// `U` — class `marshal_dump` payload.
	UserMarshal,
	/// `@` — back-reference into the object table.
	ObjectLink,
	/// `I` — instance-variable wrapper around the next value.
	InstanceVars,
	/// `c` — class constant reference.
	Class,
	/// `m` — module constant reference.
	Module,
	/// `M` — legacy class-or-module reference.
	ClassOrModule,
	/// `e` — object extended by a module.
	Extended,
	/// `C` — container subtype (user class of string/array/hash).
	UserClass,
	/// `/` — regexp source and option flags.
	Regexp,
	/// `d` — data object (`_data_load`), not supported.
	Data,
}

impl Tag {
	/// Map a tag byte to its enum value.
	pub fn from_byte(byte: u8) -> Option<Tag> {
		match byte {
			b'0' => Some(Tag::Nil),
			b'T' => Some(Tag::True),
			b'F' => Some(Tag::False),
			b'i' => Some(Tag::Fixnum),
			b'l' => Some(Tag::Bignum),
			b'f' => Some(Tag::Float),
			b'"' => Some(Tag::String),
			b':' => Some(Tag::Symbol),
			b';' => Some(Tag::SymbolLink),
			b'[' => Some(Tag::Array),
			b'{' => Some(Tag::Hash),
			b'}' => Some(Tag::HashWithDefault),
			b'o' => Some(Tag::Object),
			b'S' => Some(Tag::Struct),
			b'u' => Some(Tag::UserDefined),
			b'U' => Some(Tag::UserMarshal),
			b'@' => Some(Tag::ObjectLink),
			b'I' => Some(Tag::InstanceVars),
			b'c' => Some(Tag::Class),
			b'm' => Some(Tag::Module),
			b'M' => Some(Tag::ClassOrModule),
			b'e' => Some(Tag::Extended),
			b'C' => Some(Tag::UserClass),
			b'/' => Some(Tag::Regexp),
			b'd' => Some(Tag::Data),
			_ => None,
		}
	}

	/// The wire byte for this tag.
	pub fn byte(self) -> u8 {
		match self {
			Tag::Nil => b'0',
			Tag::True => b'T',
			Tag::False => b'F',
			Tag::Fixnum => b'i',
			Tag::Bignum => b'l',
			Tag::Float => b'f',
			Tag::String => b'"',
			Tag::Symbol => b':',
			Tag::SymbolLink => b';',
			Tag::Array => b'[',
			Tag::Hash => b'{',
			Tag::HashWithDefault => b'}',
			Tag::Object => b'o',
			Tag::Struct => b'S',
			Tag::UserDefined => b'u',
			Tag::UserMarshal => b'U',
			Tag::ObjectLink => b'@',
			Tag::InstanceVars => b'I',
			Tag::Class => b'c',
			Tag::Module => b'm',
			Tag::ClassOrModule => b'M',
			Tag::Extended => b'e',
			Tag::UserClass => b'C',
			Tag::Regexp => b'/',
			Tag::Data => b'd',
		}
	}

	/// Consume one byte from `cursor` and interpret it as a tag.
	///
	/// Unrecognized bytes fail; they are never coerced to nil.
	pub fn decode(cursor: &mut Cursor<'_>) -> Result<Tag> {
		let at = cursor.pos();
		let byte = cursor.read_u8()?;
		Tag::from_byte(byte).ok_or(MarshalError::UnknownTag { tag: byte, at })
	}
}

#[cfg(test)]
mod tests {
	use super::Tag;
	use crate::marshal::MarshalError;
	use crate::marshal::bytes::Cursor;

	#[test]
	fn every_tag_round_trips_through_its_byte() {
		for byte in 0_u8..=255 {
			if let Some(tag) = Tag::from_byte(byte) {
				assert_eq!(tag.byte(), byte);
			}
		}
	}

	#[test]
	fn decode_reads_exactly_one_byte() {
		let mut cursor = Cursor::new(b"[i");
		assert_eq!(Tag::decode(&mut cursor).unwrap(), Tag::Array);
		assert_eq!(cursor.pos(), 1);
		assert_eq!(Tag::decode(&mut cursor).unwrap(), Tag::Fixnum);
	}

	#[test]
	fn unknown_byte_is_an_error_not_nil() {
		let mut cursor = Cursor::new(&[0xff]);
		let err = Tag::decode(&mut cursor).unwrap_err();
		assert!(matches!(err, MarshalError::UnknownTag { tag: 0xff, at: 0 }));
	}
}

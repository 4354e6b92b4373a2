use serde_json::Value as Json;

use crate::marshal::bytes::Cursor;
use crate::marshal::registry::ClassRegistry;
use crate::marshal::table::{ObjectTable, SymbolTable};
use crate::marshal::tag::Tag;
use crate::marshal::value::{ClassKind, Document, Node, SymId, Value};
use crate::marshal::{MarshalError, Result};

const MARSHAL_MAJOR: u8 = 4;
const MARSHAL_MINOR: u8 = 8;

/// Runtime limits and behavior switches for graph decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum recursive value nesting depth.
	pub max_depth: u32,
	/// Maximum accepted input length in bytes.
	pub max_input_len: usize,
	/// Fail on `u` dumps with no registered hook instead of keeping the
	/// raw payload.
	pub strict_dumps: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 256,
			max_input_len: 64 << 20,
			strict_dumps: false,
		}
	}
}

/// Recursive decoder from a marshal 4.8 byte stream to a [`Document`].
///
/// All decode state is created fresh per [`Decoder::decode`] call, so one
/// decoder may be reused across inputs.
pub struct Decoder<'r> {
	registry: &'r ClassRegistry,
	opts: DecodeOptions,
}

struct DecodeState<'a> {
	cursor: Cursor<'a>,
	objects: ObjectTable,
	symbols: SymbolTable,
}

impl<'r> Decoder<'r> {
	/// Create a decoder with default options.
	pub fn new(registry: &'r ClassRegistry) -> Self {
		Self {
			registry,
			opts: DecodeOptions::default(),
		}
	}

	/// Create a decoder with explicit options.
	pub fn with_options(registry: &'r ClassRegistry, opts: DecodeOptions) -> Self {
		Self { registry, opts }
	}

	/// Decode one complete object graph from `bytes`.
	///
	/// Any error aborts the whole decode; no partial document is returned.
	/// Trailing bytes after the root value are ignored, as `Marshal.load`
	/// ignores them.
	pub fn decode(&self, bytes: &[u8]) -> Result<Document> {
		if bytes.len() > self.opts.max_input_len {
			return Err(MarshalError::InputTooLarge {
				len: bytes.len(),
				max: self.opts.max_input_len,
			});
		}

		let mut st = DecodeState {
			cursor: Cursor::new(bytes),
			objects: ObjectTable::new(),
			symbols: SymbolTable::new(),
		};

		let major = st.cursor.read_u8()?;
		let minor = st.cursor.read_u8()?;
		if major != MARSHAL_MAJOR || minor > MARSHAL_MINOR {
			return Err(MarshalError::UnsupportedVersion { major, minor });
		}

		let root = self.value(&mut st, 0)?;
		Ok(Document::new(root, st.objects, st.symbols))
	}

	fn value(&self, st: &mut DecodeState<'_>, depth: u32) -> Result<Value> {
		if depth >= self.opts.max_depth {
			return Err(MarshalError::DepthExceeded { max_depth: self.opts.max_depth });
		}

		let at = st.cursor.pos();
		match Tag::decode(&mut st.cursor)? {
			Tag::Nil => Ok(Value::Nil),
			Tag::True => Ok(Value::Bool(true)),
			Tag::False => Ok(Value::Bool(false)),
			Tag::Fixnum => Ok(Value::Int(read_long(&mut st.cursor)?)),
			Tag::Bignum => bignum(st, at),
			Tag::Float => float(st),
			Tag::String => text(st),
			Tag::Symbol => Ok(Value::Symbol(read_symbol_body(st)?)),
			Tag::SymbolLink => Ok(Value::Symbol(read_symbol_link(st)?)),
			Tag::Array => self.sequence(st, depth),
			Tag::Hash => self.mapping(st, depth, false),
			Tag::HashWithDefault => self.mapping(st, depth, true),
			// structs share the object wire shape: class symbol, member count,
			// symbol/value pairs
			Tag::Object | Tag::Struct => self.object(st, depth),
			Tag::UserDefined => self.user_dump(st, at),
			Tag::UserMarshal => self.user_marshal(st, depth),
			Tag::ObjectLink => object_link(st),
			Tag::InstanceVars => self.instance_vars(st, depth),
			Tag::Class => class_ref(st, ClassKind::Class),
			Tag::Module => class_ref(st, ClassKind::Module),
			Tag::ClassOrModule => class_ref(st, ClassKind::ClassOrModule),
			// subtype identity is not preserved; decode the payload as-is
			Tag::Extended | Tag::UserClass => {
				let _ = read_symbol(st)?;
				self.value(st, depth + 1)
			}
			Tag::Regexp => regexp(st),
			Tag::Data => {
				let class_name = read_symbol_text(st)?;
				Err(MarshalError::UnsupportedDump { class_name, at })
			}
		}
	}

	fn sequence(&self, st: &mut DecodeState<'_>, depth: u32) -> Result<Value> {
		// placeholder first so elements may back-reference the array itself
		let id = st.objects.register(Node::Sequence(Vec::new()));
		let count = read_element_count(&mut st.cursor)?;
		let mut items = Vec::with_capacity(count);
		for _ in 0..count {
			items.push(self.value(st, depth + 1)?);
		}
		st.objects.replace(id, Node::Sequence(items));
		Ok(Value::Ref(id))
	}

	fn mapping(&self, st: &mut DecodeState<'_>, depth: u32, with_default: bool) -> Result<Value> {
		let id = st.objects.register(Node::Mapping {
			entries: Vec::new(),
			default: None,
		});
		let count = read_element_count(&mut st.cursor)?;
		let mut entries = Vec::with_capacity(count);
		for _ in 0..count {
			let key = self.value(st, depth + 1)?;
			let value = self.value(st, depth + 1)?;
			entries.push((key, value));
		}
		let default = if with_default { Some(self.value(st, depth + 1)?) } else { None };
		st.objects.replace(id, Node::Mapping { entries, default });
		Ok(Value::Ref(id))
	}

	fn object(&self, st: &mut DecodeState<'_>, depth: u32) -> Result<Value> {
		let class_name = read_symbol_text(st)?;
		let id = st.objects.register(Node::Object {
			class_name: class_name.clone(),
			fields: Vec::new(),
		});
		let count = read_element_count(&mut st.cursor)?;
		let mut fields = Vec::with_capacity(count);
		for _ in 0..count {
			let key = read_symbol_text(st)?;
			let value = self.value(st, depth + 1)?;
			fields.push((key, value));
		}
		st.objects.replace(id, Node::Object { class_name, fields });
		Ok(Value::Ref(id))
	}

	fn user_dump(&self, st: &mut DecodeState<'_>, at: usize) -> Result<Value> {
		let class_name = read_symbol_text(st)?;
		let raw = read_byte_run(&mut st.cursor)?;

		if let Some(hook) = self.registry.hook(&class_name) {
			let id = st.objects.register(Node::Object {
				class_name,
				fields: Vec::new(),
			});
			let json = hook(raw)?;
			let node = hook_root_node(&mut st.objects, json);
			st.objects.replace(id, node);
			return Ok(Value::Ref(id));
		}

		if self.opts.strict_dumps {
			return Err(MarshalError::UnsupportedDump { class_name, at });
		}

		let hex: String = raw.iter().map(|byte| format!("{byte:02x}")).collect();
		let blob = Value::Ref(st.objects.alloc(Node::Text(hex)));
		let id = st.objects.register(Node::Object {
			class_name,
			fields: vec![("_dump".to_owned(), blob)],
		});
		Ok(Value::Ref(id))
	}

	fn user_marshal(&self, st: &mut DecodeState<'_>, depth: u32) -> Result<Value> {
		let class_name = read_symbol_text(st)?;
		let id = st.objects.register(Node::Object {
			class_name: class_name.clone(),
			fields: Vec::new(),
		});
		let inner = self.value(st, depth + 1)?;
		st.objects.replace(
			id,
			Node::Object {
				class_name,
				fields: vec![("marshal_dump".to_owned(), inner)],
			},
		);
		Ok(Value::Ref(id))
	}

	fn instance_vars(&self, st: &mut DecodeState<'_>, depth: u32) -> Result<Value> {
		let inner = self.value(st, depth + 1)?;
		let count = read_element_count(&mut st.cursor)?;

		let mut extra = Vec::new();
		for _ in 0..count {
			let name = read_symbol_text(st)?;
			let value = self.value(st, depth + 1)?;
			// string encoding markers carry no structure worth keeping
			if name == "E" || name == "encoding" {
				continue;
			}
			extra.push((name, value));
		}

		if !extra.is_empty()
			&& let Value::Ref(id) = inner
			&& let Some(Node::Object { fields, .. }) = st.objects.node_mut(id)
		{
			fields.extend(extra);
		}

		Ok(inner)
	}
}

fn float(st: &mut DecodeState<'_>) -> Result<Value> {
	let at = st.cursor.pos();
	let raw = read_byte_run(&mut st.cursor)?;
	let literal = String::from_utf8_lossy(raw);
	let value = match literal.as_ref() {
		"inf" => f64::INFINITY,
		"-inf" => f64::NEG_INFINITY,
		"nan" => f64::NAN,
		other => other.parse::<f64>().map_err(|_| MarshalError::BadFloatLiteral { at })?,
	};
	Ok(Value::Ref(st.objects.register(Node::Float(value))))
}

fn bignum(st: &mut DecodeState<'_>, at: usize) -> Result<Value> {
	let sign = st.cursor.read_u8()?;
	let halfwords = read_count(&mut st.cursor)?;
	let raw = st.cursor.read_exact(halfwords.saturating_mul(2))?;

	let mut magnitude: u128 = 0;
	for (i, byte) in raw.iter().enumerate() {
		if i >= 16 {
			if *byte != 0 {
				return Err(MarshalError::BignumOutOfRange { at });
			}
			continue;
		}
		magnitude |= u128::from(*byte) << (8 * i);
	}

	let limit = if sign == b'-' { 1_u128 << 63 } else { (1_u128 << 63) - 1 };
	if magnitude > limit {
		return Err(MarshalError::BignumOutOfRange { at });
	}

	let value = if sign == b'-' {
		(magnitude as i64).wrapping_neg()
	} else {
		magnitude as i64
	};
	Ok(Value::Ref(st.objects.register(Node::Int(value))))
}

fn text(st: &mut DecodeState<'_>) -> Result<Value> {
	let raw = read_byte_run(&mut st.cursor)?;
	let text = String::from_utf8_lossy(raw).into_owned();
	Ok(Value::Ref(st.objects.register(Node::Text(text))))
}

fn regexp(st: &mut DecodeState<'_>) -> Result<Value> {
	let raw = read_byte_run(&mut st.cursor)?;
	let source = String::from_utf8_lossy(raw).into_owned();
	let options = st.cursor.read_u8()?;

	let mut flags = String::new();
	if options & 1 != 0 {
		flags.push('i');
	}
	if options & 2 != 0 {
		flags.push('x');
	}
	if options & 4 != 0 {
		flags.push('m');
	}
	Ok(Value::Ref(st.objects.register(Node::Text(format!("/{source}/{flags}")))))
}

fn class_ref(st: &mut DecodeState<'_>, kind: ClassKind) -> Result<Value> {
	let raw = read_byte_run(&mut st.cursor)?;
	let name = String::from_utf8_lossy(raw).into_owned();
	Ok(Value::Ref(st.objects.register(Node::ClassRef { kind, name })))
}

fn object_link(st: &mut DecodeState<'_>) -> Result<Value> {
	let at = st.cursor.pos();
	let value = read_long(&mut st.cursor)?;
	let index = usize::try_from(value).map_err(|_| MarshalError::NegativeLength { value, at })?;
	let id = st.objects.link_target(index).ok_or(MarshalError::DanglingObjectRef {
		index,
		len: st.objects.link_count(),
		at,
	})?;
	Ok(Value::Ref(id))
}

fn read_symbol(st: &mut DecodeState<'_>) -> Result<SymId> {
	let at = st.cursor.pos();
	match Tag::decode(&mut st.cursor)? {
		Tag::Symbol => read_symbol_body(st),
		Tag::SymbolLink => read_symbol_link(st),
		other => Err(MarshalError::ExpectedSymbol { tag: other.byte(), at }),
	}
}

fn read_symbol_text(st: &mut DecodeState<'_>) -> Result<String> {
	let id = read_symbol(st)?;
	Ok(st.symbols.resolve(id).unwrap_or_default().to_owned())
}

fn read_symbol_body(st: &mut DecodeState<'_>) -> Result<SymId> {
	let raw = read_byte_run(&mut st.cursor)?;
	let name = String::from_utf8_lossy(raw).into_owned();
	Ok(st.symbols.intern(name))
}

fn read_symbol_link(st: &mut DecodeState<'_>) -> Result<SymId> {
	let at = st.cursor.pos();
	let value = read_long(&mut st.cursor)?;
	let index = usize::try_from(value).map_err(|_| MarshalError::NegativeLength { value, at })?;
	if index >= st.symbols.len() {
		return Err(MarshalError::DanglingSymbolRef {
			index,
			len: st.symbols.len(),
			at,
		});
	}
	Ok(SymId(index))
}

/// Packed integer: single-byte short forms, or up to 8 payload bytes
/// little-endian, zero- or sign-extended per the leading count byte.
fn read_long(cursor: &mut Cursor<'_>) -> Result<i64> {
	let first = cursor.read_i8()?;
	match first {
		0 => Ok(0),
		1..=4 => {
			let raw = cursor.read_exact(first as usize)?;
			let mut value: i64 = 0;
			for (i, byte) in raw.iter().enumerate() {
				value |= i64::from(*byte) << (8 * i);
			}
			Ok(value)
		}
		-4..=-1 => {
			let raw = cursor.read_exact((-first) as usize)?;
			let mut value: i64 = -1;
			for (i, byte) in raw.iter().enumerate() {
				value &= !(0xff_i64 << (8 * i));
				value |= i64::from(*byte) << (8 * i);
			}
			Ok(value)
		}
		_ if first > 0 => Ok(i64::from(first) - 5),
		_ => Ok(i64::from(first) + 5),
	}
}

fn read_count(cursor: &mut Cursor<'_>) -> Result<usize> {
	let at = cursor.pos();
	let value = read_long(cursor)?;
	usize::try_from(value).map_err(|_| MarshalError::NegativeLength { value, at })
}

/// Read an element count and validate it against the remaining input, so a
/// corrupt count fails as truncation before any allocation happens. Every
/// element costs at least one byte on the wire.
fn read_element_count(cursor: &mut Cursor<'_>) -> Result<usize> {
	let at = cursor.pos();
	let count = read_count(cursor)?;
	let rem = cursor.remaining();
	if count > rem {
		return Err(MarshalError::LengthOverrunsInput { count, rem, at });
	}
	Ok(count)
}

fn read_byte_run<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
	let len = read_count(cursor)?;
	cursor.read_exact(len)
}

/// Intern a hook-produced JSON tree as the node for a dump object's link
/// index. Children are stored with `alloc` so wire link indices stay
/// untouched.
fn hook_root_node(objects: &mut ObjectTable, json: Json) -> Node {
	match json {
		Json::Object(map) => {
			let entries = map
				.into_iter()
				.map(|(key, value)| {
					let key = Value::Ref(objects.alloc(Node::Text(key)));
					let value = hook_value(objects, value);
					(key, value)
				})
				.collect();
			Node::Mapping { entries, default: None }
		}
		Json::Array(items) => Node::Sequence(items.into_iter().map(|item| hook_value(objects, item)).collect()),
		Json::String(text) => Node::Text(text),
		Json::Number(number) => number_node(&number),
		scalar => {
			let key = Value::Ref(objects.alloc(Node::Text("value".to_owned())));
			let value = hook_value(objects, scalar);
			Node::Mapping {
				entries: vec![(key, value)],
				default: None,
			}
		}
	}
}

fn hook_value(objects: &mut ObjectTable, json: Json) -> Value {
	match json {
		Json::Null => Value::Nil,
		Json::Bool(value) => Value::Bool(value),
		Json::Number(number) => match number_node(&number) {
			Node::Int(value) => Value::Int(value),
			node => Value::Ref(objects.alloc(node)),
		},
		other => {
			let node = hook_root_node(objects, other);
			Value::Ref(objects.alloc(node))
		}
	}
}

fn number_node(number: &serde_json::Number) -> Node {
	match number.as_i64() {
		Some(value) => Node::Int(value),
		None => Node::Float(number.as_f64().unwrap_or(0.0)),
	}
}

#[cfg(test)]
mod tests {
	use super::{DecodeOptions, Decoder};
	use crate::marshal::registry::ClassRegistry;
	use crate::marshal::value::{ClassKind, Document, Node, Value};
	use crate::marshal::{MarshalError, Result};

	fn stream(body: &[u8]) -> Vec<u8> {
		let mut out = vec![4, 8];
		out.extend_from_slice(body);
		out
	}

	fn decode(body: &[u8]) -> Result<Document> {
		let registry = ClassRegistry::new();
		Decoder::new(&registry).decode(&stream(body))
	}

	fn node<'a>(doc: &'a Document, value: &Value) -> &'a Node {
		let Value::Ref(id) = value else {
			panic!("expected ref, got {value:?}");
		};
		doc.node(*id).expect("node exists")
	}

	#[test]
	fn scalars_decode_unboxed() {
		assert_eq!(*decode(b"0").unwrap().root(), Value::Nil);
		assert_eq!(*decode(b"T").unwrap().root(), Value::Bool(true));
		assert_eq!(*decode(b"F").unwrap().root(), Value::Bool(false));
		assert_eq!(decode(b"0").unwrap().link_count(), 0, "nil is not registered");
	}

	#[test]
	fn packed_fixnum_edge_values() {
		assert_eq!(*decode(b"i\x00").unwrap().root(), Value::Int(0));
		assert_eq!(*decode(b"i\x06").unwrap().root(), Value::Int(1));
		assert_eq!(*decode(b"i\xfa").unwrap().root(), Value::Int(-1));
		assert_eq!(*decode(b"i\x7f").unwrap().root(), Value::Int(122));
		assert_eq!(*decode(b"i\x80").unwrap().root(), Value::Int(-123));
		// multi-byte forms: 300 and -300
		assert_eq!(*decode(b"i\x02\x2c\x01").unwrap().root(), Value::Int(300));
		assert_eq!(*decode(b"i\xfe\xd4\xfe").unwrap().root(), Value::Int(-300));
		// four payload bytes, sign-extended
		assert_eq!(*decode(b"i\x04\xff\xff\xff\x7f").unwrap().root(), Value::Int(i64::from(i32::MAX)));
		assert_eq!(*decode(b"i\xfc\x00\x00\x00\x80").unwrap().root(), Value::Int(i64::from(i32::MIN)));
	}

	#[test]
	fn version_header_is_checked() {
		let registry = ClassRegistry::new();
		let err = Decoder::new(&registry).decode(&[4, 9, b'0']).unwrap_err();
		assert!(matches!(err, MarshalError::UnsupportedVersion { major: 4, minor: 9 }));
	}

	#[test]
	fn float_literals_including_special_forms() {
		let doc = decode(b"f\x099.25").unwrap();
		assert_eq!(*node(&doc, doc.root()), Node::Float(9.25));
		assert_eq!(doc.link_count(), 1, "floats are boxed and linkable");

		let doc = decode(b"f\x09-inf").unwrap();
		assert_eq!(*node(&doc, doc.root()), Node::Float(f64::NEG_INFINITY));

		let doc = decode(b"f\x08nan").unwrap();
		let Node::Float(value) = node(&doc, doc.root()) else {
			panic!("expected float");
		};
		assert!(value.is_nan());

		assert!(matches!(decode(b"f\x08abc").unwrap_err(), MarshalError::BadFloatLiteral { at: 3 }));
	}

	#[test]
	fn strings_register_in_the_object_table() {
		let doc = decode(b"\"\x0ahello").unwrap();
		assert_eq!(*node(&doc, doc.root()), Node::Text("hello".to_owned()));
		assert_eq!(doc.link_count(), 1);
	}

	#[test]
	fn symbols_and_symlinks_share_one_table_entry() {
		// [:a, :a] — second occurrence is a symlink to entry 0
		let doc = decode(b"[\x07:\x06a;\x00").unwrap();
		let Node::Sequence(items) = node(&doc, doc.root()) else {
			panic!("expected sequence");
		};
		assert_eq!(items[0], items[1]);
		assert_eq!(doc.symbol_count(), 1);
		let Value::Symbol(id) = items[0] else {
			panic!("expected symbol");
		};
		assert_eq!(doc.symbol(id), Some("a"));
	}

	#[test]
	fn round_trip_shape_hash_of_array_and_nil() {
		// {a: [1, 2, "x"], b: nil}
		let doc = decode(b"{\x07:\x06a[\x08i\x06i\x07\"\x06x:\x06b0").unwrap();
		let Node::Mapping { entries, default } = node(&doc, doc.root()) else {
			panic!("expected mapping");
		};
		assert!(default.is_none());
		assert_eq!(entries.len(), 2);

		let Value::Symbol(first_key) = entries[0].0 else {
			panic!("expected symbol key");
		};
		assert_eq!(doc.symbol(first_key), Some("a"));

		let Node::Sequence(items) = node(&doc, &entries[0].1) else {
			panic!("expected sequence");
		};
		assert_eq!(items[0], Value::Int(1));
		assert_eq!(items[1], Value::Int(2));
		assert_eq!(*node(&doc, &items[2]), Node::Text("x".to_owned()));
		assert_eq!(entries[1].1, Value::Nil);
	}

	#[test]
	fn self_referential_array_resolves_to_itself() {
		// one-element array whose element links back to the array
		let doc = decode(b"[\x06@\x00").unwrap();
		let root = *doc.root();
		let Node::Sequence(items) = node(&doc, &root) else {
			panic!("expected sequence");
		};
		assert_eq!(items[0], root);
	}

	#[test]
	fn shared_string_decodes_to_one_instance() {
		// ["x", <link to "x">]
		let doc = decode(b"[\x07\"\x06x@\x06").unwrap();
		let Node::Sequence(items) = node(&doc, doc.root()) else {
			panic!("expected sequence");
		};
		assert_eq!(items[0], items[1]);
		assert_eq!(*node(&doc, &items[0]), Node::Text("x".to_owned()));
	}

	#[test]
	fn truncated_array_fails_with_no_partial_result() {
		// declares 5 elements, carries 3
		let err = decode(b"[\x0ai\x06i\x07i\x08").unwrap_err();
		assert!(matches!(err, MarshalError::UnexpectedEof { .. }));
	}

	#[test]
	fn oversized_count_fails_before_allocating() {
		// array claiming ~50 million elements in a tiny buffer
		let err = decode(b"[\x04\x00\x00\x00\x03").unwrap_err();
		assert!(matches!(err, MarshalError::LengthOverrunsInput { .. }));
	}

	#[test]
	fn unknown_tag_byte_is_rejected() {
		let err = decode(&[0xff]).unwrap_err();
		assert!(matches!(err, MarshalError::UnknownTag { tag: 0xff, at: 2 }));
	}

	#[test]
	fn dangling_object_link_is_rejected() {
		// ["x", <link 7>] with only two registrations
		let err = decode(b"[\x07\"\x06x@\x0c").unwrap_err();
		assert!(matches!(err, MarshalError::DanglingObjectRef { index: 7, len: 2, .. }));
	}

	#[test]
	fn dangling_symbol_link_is_rejected() {
		let err = decode(b";\x00").unwrap_err();
		assert!(matches!(err, MarshalError::DanglingSymbolRef { index: 0, len: 0, .. }));
	}

	#[test]
	fn hash_default_value_stays_out_of_the_entries() {
		// {1 => 2} with default 9
		let doc = decode(b"}\x06i\x06i\x07i\x0e").unwrap();
		let Node::Mapping { entries, default } = node(&doc, doc.root()) else {
			panic!("expected mapping");
		};
		assert_eq!(entries, &vec![(Value::Int(1), Value::Int(2))]);
		assert_eq!(*default, Some(Value::Int(9)));
	}

	#[test]
	fn object_decodes_class_name_and_fields_in_order() {
		// #<Foo @x=5, @y="z">
		let doc = decode(b"o:\x08Foo\x07:\x07@xi\x0a:\x07@y\"\x06z").unwrap();
		let Node::Object { class_name, fields } = node(&doc, doc.root()) else {
			panic!("expected object");
		};
		assert_eq!(class_name, "Foo");
		assert_eq!(fields[0].0, "@x");
		assert_eq!(fields[0].1, Value::Int(5));
		assert_eq!(fields[1].0, "@y");
	}

	#[test]
	fn object_field_key_must_be_a_symbol() {
		let err = decode(b"o:\x08Foo\x06i\x06i\x0a").unwrap_err();
		assert!(matches!(err, MarshalError::ExpectedSymbol { tag: b'i', .. }));
	}

	#[test]
	fn ivar_wrapped_string_drops_encoding_marker() {
		// "x" with the usual :E => true wrapper
		let doc = decode(b"I\"\x06x\x06:\x06ET").unwrap();
		assert_eq!(*node(&doc, doc.root()), Node::Text("x".to_owned()));
	}

	#[test]
	fn ivar_wrapper_merges_extra_fields_into_objects() {
		// #<Foo> with a wrapper-supplied @x = 1
		let doc = decode(b"Io:\x08Foo\x00\x06:\x07@xi\x06").unwrap();
		let Node::Object { fields, .. } = node(&doc, doc.root()) else {
			panic!("expected object");
		};
		assert_eq!(fields, &vec![("@x".to_owned(), Value::Int(1))]);
	}

	#[test]
	fn bignum_within_and_beyond_i64() {
		// 2^30 as a two-halfword bignum
		let doc = decode(b"l+\x07\x00\x00\x00\x40").unwrap();
		assert_eq!(*node(&doc, doc.root()), Node::Int(1 << 30));

		// 2^64 overflows a signed 64-bit value
		let err = decode(b"l+\x0a\x00\x00\x00\x00\x00\x00\x00\x00\x01\x00").unwrap_err();
		assert!(matches!(err, MarshalError::BignumOutOfRange { .. }));
	}

	#[test]
	fn class_and_module_refs_keep_their_names() {
		let doc = decode(b"c\x08Foo").unwrap();
		assert_eq!(
			*node(&doc, doc.root()),
			Node::ClassRef {
				kind: ClassKind::Class,
				name: "Foo".to_owned(),
			}
		);
	}

	#[test]
	fn user_class_wrapper_passes_through_to_the_payload() {
		// C:MyHash{...} decodes as the underlying hash
		let doc = decode(b"C:\x0bMyHash{\x06i\x06i\x07").unwrap();
		assert!(matches!(node(&doc, doc.root()), Node::Mapping { .. }));
	}

	#[test]
	fn unhooked_user_dump_keeps_the_raw_payload_as_hex() {
		let doc = decode(b"u:\x09Blob\x07\xab\xcd").unwrap();
		let Node::Object { class_name, fields } = node(&doc, doc.root()) else {
			panic!("expected object");
		};
		assert_eq!(class_name, "Blob");
		assert_eq!(fields[0].0, "_dump");
		assert_eq!(*node(&doc, &fields[0].1), Node::Text("abcd".to_owned()));
		assert_eq!(doc.link_count(), 1, "dump payload must not claim a link index");
	}

	#[test]
	fn strict_dumps_rejects_unhooked_classes() {
		let registry = ClassRegistry::new();
		let opts = DecodeOptions {
			strict_dumps: true,
			..DecodeOptions::default()
		};
		let err = Decoder::with_options(&registry, opts)
			.decode(&stream(b"u:\x09Blob\x07\xab\xcd"))
			.unwrap_err();
		assert!(matches!(err, MarshalError::UnsupportedDump { class_name, .. } if class_name == "Blob"));
	}

	#[test]
	fn hooked_user_dump_interns_the_hook_output() {
		let mut registry = ClassRegistry::new();
		registry.register("Pair", Box::new(|bytes| Ok(serde_json::json!({"a": bytes[0], "b": bytes[1]}))));
		let doc = Decoder::new(&registry).decode(&stream(b"u:\x09Pair\x07\x01\x02")).unwrap();

		let Node::Mapping { entries, .. } = node(&doc, doc.root()) else {
			panic!("expected mapping");
		};
		assert_eq!(*node(&doc, &entries[0].0), Node::Text("a".to_owned()));
		assert_eq!(entries[0].1, Value::Int(1));
		assert_eq!(entries[1].1, Value::Int(2));
		assert_eq!(doc.link_count(), 1, "hook output is synthetic, not linkable");
	}

	#[test]
	fn user_marshal_decodes_generically() {
		// U:Range [1, 2]
		let doc = decode(b"U:\x0aRange[\x07i\x06i\x07").unwrap();
		let Node::Object { class_name, fields } = node(&doc, doc.root()) else {
			panic!("expected object");
		};
		assert_eq!(class_name, "Range");
		assert_eq!(fields[0].0, "marshal_dump");
		assert!(matches!(node(&doc, &fields[0].1), Node::Sequence(_)));
	}

	#[test]
	fn data_objects_are_unsupported() {
		let err = decode(b"d:\x08Ptr0").unwrap_err();
		assert!(matches!(err, MarshalError::UnsupportedDump { class_name, .. } if class_name == "Ptr"));
	}

	#[test]
	fn regexp_renders_source_and_flags() {
		let doc = decode(b"/\x08abc\x01").unwrap();
		assert_eq!(*node(&doc, doc.root()), Node::Text("/abc/i".to_owned()));
	}

	#[test]
	fn depth_limit_bounds_nested_input() {
		let registry = ClassRegistry::new();
		let opts = DecodeOptions {
			max_depth: 4,
			..DecodeOptions::default()
		};
		// [[[[[0]]]]] nests past the limit
		let err = Decoder::with_options(&registry, opts)
			.decode(&stream(b"[\x06[\x06[\x06[\x06[\x060"))
			.unwrap_err();
		assert!(matches!(err, MarshalError::DepthExceeded { max_depth: 4 }));
	}

	#[test]
	fn input_size_limit_is_enforced() {
		let registry = ClassRegistry::new();
		let opts = DecodeOptions {
			max_input_len: 4,
			..DecodeOptions::default()
		};
		let err = Decoder::with_options(&registry, opts).decode(&stream(b"i\x06\x00")).unwrap_err();
		assert!(matches!(err, MarshalError::InputTooLarge { len: 5, max: 4 }));
	}

	#[test]
	fn trailing_bytes_after_the_root_are_ignored() {
		let doc = decode(b"i\x06garbage").unwrap();
		assert_eq!(*doc.root(), Value::Int(1));
	}

	#[test]
	fn negative_count_is_rejected() {
		let err = decode(b"[\xfa").unwrap_err();
		assert!(matches!(err, MarshalError::NegativeLength { value: -1, .. }));
	}
}

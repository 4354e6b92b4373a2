//! Built-in dump hooks for the RGSS runtime classes found in RPG Maker
//! data files: `Color` and `Tone` (four little-endian doubles) and `Table`
//! (dimension sizes and element count as little-endian `i32`s followed by
//! `i16` elements).

use serde_json::{Map, Value as Json, json};

use crate::marshal::bytes::Cursor;
use crate::marshal::{ClassRegistry, MarshalError, Result};

/// A registry preloaded with the RGSS runtime hooks.
pub fn registry() -> ClassRegistry {
	let mut registry = ClassRegistry::new();
	register_defaults(&mut registry);
	registry
}

/// Register the `Color`, `Tone`, and `Table` hooks into `registry`.
pub fn register_defaults(registry: &mut ClassRegistry) {
	registry.register("Color", Box::new(|bytes| decode_quad(bytes, "Color", ["red", "green", "blue", "alpha"])));
	registry.register("Tone", Box::new(|bytes| decode_quad(bytes, "Tone", ["red", "green", "blue", "gray"])));
	registry.register("Table", Box::new(decode_table));
}

fn decode_quad(bytes: &[u8], class_name: &'static str, keys: [&'static str; 4]) -> Result<Json> {
	if bytes.len() != 32 {
		return Err(hook_failed(class_name, format!("expected 32 bytes, got {}", bytes.len())));
	}

	let mut cursor = Cursor::new(bytes);
	let mut out = Map::new();
	out.insert("_class".to_owned(), Json::String(class_name.to_owned()));
	for key in keys {
		let value = cursor.read_f64_le().map_err(|err| hook_failed(class_name, err.to_string()))?;
		out.insert(key.to_owned(), json!(value));
	}
	Ok(Json::Object(out))
}

fn decode_table(bytes: &[u8]) -> Result<Json> {
	let mut cursor = Cursor::new(bytes);
	let read_i32 = |cursor: &mut Cursor<'_>| cursor.read_i32_le().map_err(|err| hook_failed("Table", err.to_string()));

	let x_size = read_i32(&mut cursor)?;
	let y_size = read_i32(&mut cursor)?;
	let z_size = read_i32(&mut cursor)?;
	let count = read_i32(&mut cursor)?;
	let count = usize::try_from(count).map_err(|_| hook_failed("Table", format!("negative element count {count}")))?;
	if cursor.remaining() != count * 2 {
		return Err(hook_failed(
			"Table",
			format!("element count {count} does not match {} payload bytes", cursor.remaining()),
		));
	}

	let mut data = Vec::with_capacity(count);
	for _ in 0..count {
		data.push(cursor.read_i16_le().map_err(|err| hook_failed("Table", err.to_string()))?);
	}

	Ok(json!({
		"_class": "Table",
		"x_size": x_size,
		"y_size": y_size,
		"z_size": z_size,
		"data": data,
	}))
}

fn hook_failed(class_name: &str, message: String) -> MarshalError {
	MarshalError::DumpHookFailed {
		class_name: class_name.to_owned(),
		message,
	}
}

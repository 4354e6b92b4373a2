use crate::marshal::value::{Document, Node, ObjId, Value};
use crate::marshal::{MarshalError, Result};

/// Sentinel emitted in place of a node that is still being encoded further
/// up the recursion stack.
pub const CYCLE_MARKER: &str = "<cyclic-reference>";

/// Formatting controls for JSON output.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
	/// Spaces per indentation level.
	pub indent: usize,
	/// Maximum recursive encode depth.
	pub max_depth: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			indent: 2,
			max_depth: 512,
		}
	}
}

/// Render a decoded document as pretty-printed JSON text.
///
/// Keys follow encounter order, so encoding the same document twice is
/// byte-identical. Cyclic edges render as [`CYCLE_MARKER`]; shared acyclic
/// nodes re-encode as independent copies.
pub fn encode(doc: &Document, opts: &EncodeOptions) -> Result<String> {
	let mut encoder = Encoder {
		doc,
		opts: *opts,
		out: String::new(),
		visiting: Vec::new(),
	};
	encoder.value(doc.root(), 0, Some(0))?;
	Ok(encoder.out)
}

struct Encoder<'a> {
	doc: &'a Document,
	opts: EncodeOptions,
	out: String,
	visiting: Vec<ObjId>,
}

impl<'a> Encoder<'a> {
	/// `indent` is the current pretty level, or `None` for the compact
	/// single-line form used when a container serves as a mapping key.
	fn value(&mut self, value: &Value, depth: u32, indent: Option<usize>) -> Result<()> {
		match value {
			Value::Nil => self.out.push_str("null"),
			Value::Bool(true) => self.out.push_str("true"),
			Value::Bool(false) => self.out.push_str("false"),
			Value::Int(v) => self.out.push_str(&v.to_string()),
			Value::Symbol(id) => {
				let text = self.doc.symbol(*id).unwrap_or_default();
				push_json_string(&mut self.out, text);
			}
			Value::Ref(id) => self.node(*id, depth, indent)?,
		}
		Ok(())
	}

	fn node(&mut self, id: ObjId, depth: u32, indent: Option<usize>) -> Result<()> {
		if depth >= self.opts.max_depth {
			return Err(MarshalError::DepthExceeded { max_depth: self.opts.max_depth });
		}
		if self.visiting.contains(&id) {
			push_json_string(&mut self.out, CYCLE_MARKER);
			return Ok(());
		}

		let doc = self.doc;
		let Some(node) = doc.node(id) else {
			push_json_string(&mut self.out, "<unresolved>");
			return Ok(());
		};

		self.visiting.push(id);
		let outcome = self.node_body(node, depth, indent);
		self.visiting.pop();
		outcome
	}

	fn node_body(&mut self, node: &'a Node, depth: u32, indent: Option<usize>) -> Result<()> {
		match node {
			Node::Int(v) => self.out.push_str(&v.to_string()),
			Node::Float(v) => {
				let literal = float_literal(*v);
				if v.is_finite() {
					self.out.push_str(&literal);
				} else {
					push_json_string(&mut self.out, &literal);
				}
			}
			Node::Text(text) => push_json_string(&mut self.out, text),
			Node::ClassRef { name, .. } => push_json_string(&mut self.out, name),
			Node::Sequence(items) => self.sequence(items, depth, indent)?,
			Node::Mapping { entries, .. } => self.mapping(entries, depth, indent)?,
			Node::Object { class_name, fields } => self.object(class_name, fields, depth, indent)?,
		}
		Ok(())
	}

	fn sequence(&mut self, items: &'a [Value], depth: u32, indent: Option<usize>) -> Result<()> {
		if items.is_empty() {
			self.out.push_str("[]");
			return Ok(());
		}

		match indent {
			Some(level) => {
				self.out.push_str("[\n");
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						self.out.push_str(",\n");
					}
					self.pad(level + 1);
					self.value(item, depth + 1, Some(level + 1))?;
				}
				self.out.push('\n');
				self.pad(level);
				self.out.push(']');
			}
			None => {
				self.out.push('[');
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						self.out.push(',');
					}
					self.value(item, depth + 1, None)?;
				}
				self.out.push(']');
			}
		}
		Ok(())
	}

	/// Hash entries render in encounter order; the optional default value
	/// is metadata, not an entry, and is not rendered.
	fn mapping(&mut self, entries: &'a [(Value, Value)], depth: u32, indent: Option<usize>) -> Result<()> {
		if entries.is_empty() {
			self.out.push_str("{}");
			return Ok(());
		}

		match indent {
			Some(level) => {
				self.out.push_str("{\n");
				for (i, (key, value)) in entries.iter().enumerate() {
					if i > 0 {
						self.out.push_str(",\n");
					}
					self.pad(level + 1);
					let key = self.key_text(key, depth)?;
					push_json_string(&mut self.out, &key);
					self.out.push_str(": ");
					self.value(value, depth + 1, Some(level + 1))?;
				}
				self.out.push('\n');
				self.pad(level);
				self.out.push('}');
			}
			None => {
				self.out.push('{');
				for (i, (key, value)) in entries.iter().enumerate() {
					if i > 0 {
						self.out.push(',');
					}
					let key = self.key_text(key, depth)?;
					push_json_string(&mut self.out, &key);
					self.out.push(':');
					self.value(value, depth + 1, None)?;
				}
				self.out.push('}');
			}
		}
		Ok(())
	}

	/// Objects render like mappings with a leading `"_class"` pair naming
	/// the Ruby class, then fields in encounter order.
	fn object(&mut self, class_name: &str, fields: &'a [(String, Value)], depth: u32, indent: Option<usize>) -> Result<()> {
		match indent {
			Some(level) => {
				self.out.push_str("{\n");
				self.pad(level + 1);
				self.out.push_str("\"_class\": ");
				push_json_string(&mut self.out, class_name);
				for (key, value) in fields {
					self.out.push_str(",\n");
					self.pad(level + 1);
					push_json_string(&mut self.out, key);
					self.out.push_str(": ");
					self.value(value, depth + 1, Some(level + 1))?;
				}
				self.out.push('\n');
				self.pad(level);
				self.out.push('}');
			}
			None => {
				self.out.push_str("{\"_class\":");
				push_json_string(&mut self.out, class_name);
				for (key, value) in fields {
					self.out.push(',');
					push_json_string(&mut self.out, key);
					self.out.push(':');
					self.value(value, depth + 1, None)?;
				}
				self.out.push('}');
			}
		}
		Ok(())
	}

	/// JSON object keys must be strings; scalar keys use their literal text
	/// (a nil key renders empty, as Ruby's `to_s`), container keys their
	/// compact one-line form.
	fn key_text(&mut self, key: &Value, depth: u32) -> Result<String> {
		match key {
			Value::Nil => Ok(String::new()),
			Value::Bool(v) => Ok(v.to_string()),
			Value::Int(v) => Ok(v.to_string()),
			Value::Symbol(id) => Ok(self.doc.symbol(*id).unwrap_or_default().to_owned()),
			Value::Ref(id) => {
				let doc = self.doc;
				match doc.node(*id) {
					Some(Node::Text(text)) => Ok(text.clone()),
					Some(Node::Int(v)) => Ok(v.to_string()),
					Some(Node::Float(v)) => Ok(float_literal(*v)),
					Some(Node::ClassRef { name, .. }) => Ok(name.clone()),
					_ => {
						let mut sub = Encoder {
							doc,
							opts: self.opts,
							out: String::new(),
							visiting: self.visiting.clone(),
						};
						sub.value(key, depth + 1, None)?;
						Ok(sub.out)
					}
				}
			}
		}
	}

	fn pad(&mut self, level: usize) {
		self.out.push_str(&" ".repeat(level * self.opts.indent));
	}
}

/// Canonical decimal rendering: integral floats keep a trailing `.0`,
/// non-finite values use spelled-out names.
fn float_literal(value: f64) -> String {
	if value.is_nan() {
		return "NaN".to_owned();
	}
	if value.is_infinite() {
		return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
	}
	if value == value.trunc() && value.abs() < 1e16 {
		return format!("{value:.1}");
	}
	format!("{value}")
}

fn push_json_string(out: &mut String, text: &str) {
	out.push('"');
	for ch in text.chars() {
		match ch {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\u{8}' => out.push_str("\\b"),
			'\u{c}' => out.push_str("\\f"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			ch if (ch as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", ch as u32)),
			ch => out.push(ch),
		}
	}
	out.push('"');
}

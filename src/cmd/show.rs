use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use rxdoc::marshal::{ClassRegistry, Decoder, Document, EncodeOptions, Node, Value, encode, rgss};

/// Behavior switches for the show command.
#[derive(Debug, Clone)]
pub struct ShowOptions {
	/// Spaces per indentation level.
	pub indent: usize,
	/// Print a JSON summary instead of the full document.
	pub stats: bool,
	/// Skip the built-in RGSS class hooks.
	pub no_rgss: bool,
}

#[derive(Serialize)]
struct Stats {
	path: String,
	root: &'static str,
	nodes: usize,
	links: usize,
	symbols: usize,
}

/// Decode `input` and print it (or its summary) to stdout.
pub fn run(input: PathBuf, options: ShowOptions) -> rxdoc::marshal::Result<()> {
	let bytes = fs::read(&input)?;

	let mut registry = ClassRegistry::new();
	if !options.no_rgss {
		rgss::register_defaults(&mut registry);
	}
	let document = Decoder::new(&registry).decode(&bytes)?;

	if options.stats {
		let stats = Stats {
			path: input.display().to_string(),
			root: root_kind(&document),
			nodes: document.node_count(),
			links: document.link_count(),
			symbols: document.symbol_count(),
		};
		let rendered = serde_json::to_string_pretty(&stats).map_err(std::io::Error::other)?;
		println!("{rendered}");
	} else {
		let encode_options = EncodeOptions {
			indent: options.indent,
			..EncodeOptions::default()
		};
		let text = encode(&document, &encode_options)?;
		println!("{text}");
	}

	Ok(())
}

fn root_kind(document: &Document) -> &'static str {
	match document.root() {
		Value::Nil => "nil",
		Value::Bool(_) => "bool",
		Value::Int(_) => "int",
		Value::Symbol(_) => "symbol",
		Value::Ref(id) => match document.node(*id) {
			Some(Node::Int(_)) => "int",
			Some(Node::Float(_)) => "float",
			Some(Node::Text(_)) => "text",
			Some(Node::Sequence(_)) => "sequence",
			Some(Node::Mapping { .. }) => "mapping",
			Some(Node::Object { .. }) => "object",
			Some(Node::ClassRef { .. }) => "class",
			None => "unknown",
		},
	}
}

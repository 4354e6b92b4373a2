use crate::marshal::value::{Node, ObjId, SymId};

/// Encounter-ordered symbol registry, the target space of `;` symlinks.
#[derive(Debug, Default)]
pub struct SymbolTable {
	names: Vec<String>,
}

impl SymbolTable {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a symbol name, returning its stable index.
	///
	/// Every `:` occurrence appends; the wire format guarantees a name is
	/// written in full only once, so no dedup happens here.
	pub fn intern(&mut self, name: String) -> SymId {
		let id = SymId(self.names.len());
		self.names.push(name);
		id
	}

	/// Resolve a symbol index to its name.
	pub fn resolve(&self, id: SymId) -> Option<&str> {
		self.names.get(id.0).map(String::as_str)
	}

	/// Number of interned symbols.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Whether no symbol has been interned yet.
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

/// Node arena plus the encounter-ordered link registry targeted by `@`
/// back-references.
///
/// Wire objects claim link indices monotonically, placeholder-first, and an
/// index is never reused. Synthetic nodes produced by dump hooks are stored
/// with [`ObjectTable::alloc`] so they never shift wire link indices.
#[derive(Debug, Default)]
pub struct ObjectTable {
	nodes: Vec<Node>,
	links: Vec<ObjId>,
}

impl ObjectTable {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Store a node without granting it a link index.
	pub fn alloc(&mut self, node: Node) -> ObjId {
		let id = ObjId(self.nodes.len());
		self.nodes.push(node);
		id
	}

	/// Store a node and append it to the link registry.
	pub fn register(&mut self, node: Node) -> ObjId {
		let id = self.alloc(node);
		self.links.push(id);
		id
	}

	/// Resolve a `@` back-reference index to the node it registered.
	pub fn link_target(&self, index: usize) -> Option<ObjId> {
		self.links.get(index).copied()
	}

	/// Look up a node by arena id.
	pub fn node(&self, id: ObjId) -> Option<&Node> {
		self.nodes.get(id.0)
	}

	/// Mutable access to a node, used to fill placeholders in.
	pub fn node_mut(&mut self, id: ObjId) -> Option<&mut Node> {
		self.nodes.get_mut(id.0)
	}

	/// Replace a placeholder with its completed node.
	pub fn replace(&mut self, id: ObjId, node: Node) {
		// ids only come from alloc/register, so the slot exists
		self.nodes[id.0] = node;
	}

	/// Entries addressable by back-reference.
	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// Total stored nodes, linked and synthetic.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}
}

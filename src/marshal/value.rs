use crate::marshal::table::{ObjectTable, SymbolTable};

/// Index of a name in the decode symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymId(pub usize);

/// Index of a node in the decode object arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub usize);

/// An unboxed value or a handle into the decode tables.
///
/// Nil, booleans, and fixnums are unboxed exactly as the wire format treats
/// them; everything else lives behind a table index so shared and cyclic
/// references resolve to one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
	/// Ruby `nil`.
	Nil,
	/// `true` / `false`.
	Bool(bool),
	/// Fixnum.
	Int(i64),
	/// Interned symbol.
	Symbol(SymId),
	/// Heap-registered node.
	Ref(ObjId),
}

/// Kind of constant reference (`c`, `m`, or legacy `M`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
	/// A class constant.
	Class,
	/// A module constant.
	Module,
	/// Legacy tag that does not distinguish the two.
	ClassOrModule,
}

/// One heap-registered node of the decoded graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	/// Bignum narrowed to 64 bits.
	Int(i64),
	/// Float.
	Float(f64),
	/// String (or rendered regexp) text.
	Text(String),
	/// Array, in encounter order.
	Sequence(Vec<Value>),
	/// Hash, in encounter order.
	Mapping {
		/// Key/value entries as decoded.
		entries: Vec<(Value, Value)>,
		/// Default value of a `}` hash; never part of `entries`.
		default: Option<Value>,
	},
	/// Generic object: class name plus named fields in encounter order.
	Object {
		/// Ruby class name.
		class_name: String,
		/// Instance variables or struct members.
		fields: Vec<(String, Value)>,
	},
	/// Class or module constant.
	ClassRef {
		/// Whether the constant is a class, module, or unknown.
		kind: ClassKind,
		/// Fully qualified constant name.
		name: String,
	},
}

/// One fully decoded object graph together with its reference tables.
///
/// The tables own every node for the lifetime of the document; the root and
/// all container entries address them by index, so back-references never
/// duplicate data and cycles stay representable.
#[derive(Debug)]
pub struct Document {
	root: Value,
	objects: ObjectTable,
	symbols: SymbolTable,
}

impl Document {
	pub(crate) fn new(root: Value, objects: ObjectTable, symbols: SymbolTable) -> Self {
		Self { root, objects, symbols }
	}

	/// Root value of the graph.
	pub fn root(&self) -> &Value {
		&self.root
	}

	/// Look up a node by arena id.
	pub fn node(&self, id: ObjId) -> Option<&Node> {
		self.objects.node(id)
	}

	/// Look up a symbol name.
	pub fn symbol(&self, id: SymId) -> Option<&str> {
		self.symbols.resolve(id)
	}

	/// Total nodes in the arena, wire-linked and synthetic.
	pub fn node_count(&self) -> usize {
		self.objects.node_count()
	}

	/// Entries addressable by wire back-references.
	pub fn link_count(&self) -> usize {
		self.objects.link_count()
	}

	/// Interned symbols.
	pub fn symbol_count(&self) -> usize {
		self.symbols.len()
	}
}

use std::collections::HashMap;

use crate::marshal::Result;

/// Decode hook for one `u` user-defined class.
///
/// Receives the raw `_dump` payload and returns a plain JSON tree; the
/// decoder interns that tree as synthetic nodes under the object's single
/// link index. The root should be an object, array, or string — scalar
/// roots are wrapped in a single-entry map.
pub type DumpHook = Box<dyn Fn(&[u8]) -> Result<serde_json::Value>>;

/// Explicit class-name to decode-hook mapping handed to the decoder.
///
/// Always passed in at construction time, never looked up through ambient
/// state. Classes without a hook decode generically.
#[derive(Default)]
pub struct ClassRegistry {
	hooks: HashMap<String, DumpHook>,
}

impl ClassRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register (or override) the hook for a class name.
	pub fn register(&mut self, class_name: impl Into<String>, hook: DumpHook) {
		self.hooks.insert(class_name.into(), hook);
	}

	/// Look up the hook for a class name.
	pub fn hook(&self, class_name: &str) -> Option<&DumpHook> {
		self.hooks.get(class_name)
	}

	/// Number of registered hooks.
	pub fn len(&self) -> usize {
		self.hooks.len()
	}

	/// Whether no hook is registered.
	pub fn is_empty(&self) -> bool {
		self.hooks.is_empty()
	}
}

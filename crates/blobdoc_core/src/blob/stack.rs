use crate::blob::{BlobError, Result};

/// Declared type of a node as read from its header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeToken {
	/// Node carried no type entry.
	#[default]
	None,
	/// Type declared inline with a fresh id.
	Named {
		/// Id assigned to the type for later back-references.
		id: i32,
		/// Serialized type name.
		name: Box<str>,
	},
	/// Back-reference to a type declared earlier.
	Id {
		/// Referenced type id.
		id: i32,
		/// Name recorded for that id, when it was seen.
		name: Option<Box<str>>,
	},
}

impl TypeToken {
	/// Return the type name when known.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::None => None,
			Self::Named { name, .. } => Some(name),
			Self::Id { name, .. } => name.as_deref(),
		}
	}
}

/// One open node or array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFrame {
	/// Entry name, inherited from the parent node for arrays.
	pub name: Option<Box<str>>,
	/// Reference node id, `-1` for struct nodes and arrays without one.
	pub id: i32,
	/// Type entry read from the node header.
	pub type_token: TypeToken,
	/// Whether the frame is an array.
	pub is_array: bool,
}

impl NodeFrame {
	/// Frame for a node entry.
	pub fn node(name: Option<Box<str>>, id: i32, type_token: TypeToken) -> Self {
		Self {
			name,
			id,
			type_token,
			is_array: false,
		}
	}
}

/// Stack of open nodes and arrays, shared so arrays can nest directly.
#[derive(Debug)]
pub struct NodeStack {
	frames: Vec<NodeFrame>,
	max_depth: usize,
}

impl NodeStack {
	/// Create an empty stack with a hard depth cap.
	pub fn new(max_depth: usize) -> Self {
		Self {
			frames: Vec::new(),
			max_depth,
		}
	}

	/// Return current nesting depth.
	pub fn depth(&self) -> usize {
		self.frames.len()
	}

	/// Return whether no container is open.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Return the innermost open frame.
	pub fn top(&self) -> Option<&NodeFrame> {
		self.frames.last()
	}

	/// Push a node frame.
	pub fn push_node(&mut self, frame: NodeFrame) -> Result<()> {
		self.ensure_room()?;
		self.frames.push(frame);
		Ok(())
	}

	/// Push an array frame.
	///
	/// Under a node parent the frame inherits the node's name, id and
	/// type; under an array parent it carries none.
	pub fn push_array(&mut self) -> Result<()> {
		self.ensure_room()?;
		let frame = match self.frames.last() {
			Some(parent) if !parent.is_array => NodeFrame {
				is_array: true,
				..parent.clone()
			},
			_ => NodeFrame {
				name: None,
				id: -1,
				type_token: TypeToken::None,
				is_array: true,
			},
		};
		self.frames.push(frame);
		Ok(())
	}

	/// Pop the innermost frame.
	pub fn pop(&mut self) -> Option<NodeFrame> {
		self.frames.pop()
	}

	fn ensure_room(&self) -> Result<()> {
		if self.frames.len() >= self.max_depth {
			return Err(BlobError::DepthExceeded { max_depth: self.max_depth });
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::{NodeFrame, NodeStack, TypeToken};
	use crate::blob::BlobError;

	fn named(name: &str, id: i32) -> NodeFrame {
		NodeFrame::node(
			Some(name.into()),
			id,
			TypeToken::Named {
				id: 0,
				name: "List`1".into(),
			},
		)
	}

	#[test]
	fn array_under_node_inherits_parent_identity() {
		let mut stack = NodeStack::new(8);
		stack.push_node(named("items", 4)).expect("push node");
		stack.push_array().expect("push array");

		let top = stack.top().expect("array frame");
		assert!(top.is_array);
		assert_eq!(top.name.as_deref(), Some("items"));
		assert_eq!(top.id, 4);
		assert_eq!(top.type_token.name(), Some("List`1"));
	}

	#[test]
	fn array_under_array_is_anonymous() {
		let mut stack = NodeStack::new(8);
		stack.push_node(named("grid", 1)).expect("push node");
		stack.push_array().expect("outer array");
		stack.push_array().expect("jagged inner array");

		let top = stack.top().expect("inner frame");
		assert!(top.is_array);
		assert_eq!(top.name, None);
		assert_eq!(top.id, -1);
		assert_eq!(stack.depth(), 3);
	}

	#[test]
	fn push_beyond_cap_fails() {
		let mut stack = NodeStack::new(2);
		stack.push_array().expect("first");
		stack.push_array().expect("second");
		let err = stack.push_node(named("deep", 0)).expect_err("third exceeds cap");
		assert!(matches!(err, BlobError::DepthExceeded { max_depth: 2 }));
		assert_eq!(stack.depth(), 2);
	}

	#[test]
	fn pop_returns_frames_in_reverse() {
		let mut stack = NodeStack::new(4);
		stack.push_node(named("a", 1)).expect("push");
		stack.push_array().expect("push");
		assert!(stack.pop().is_some_and(|frame| frame.is_array));
		assert!(stack.pop().is_some_and(|frame| !frame.is_array));
		assert!(stack.pop().is_none());
		assert!(stack.is_empty());
	}
}

//! Path segment tokens.
//!
//! A resource path such as `Customers/Orders(Id=5)/$count` is held as a
//! singly-linked chain of [`PathSegment`] nodes. Each node owns its successor,
//! so the head owns the whole chain. Nodes are never mutated once built;
//! producing a different chain always means allocating new nodes.
//!
//! # Example
//!
//! ```
//! use odatapath::segment::{NamedValue, PathSegment, RegularSegment, SystemSegment};
//!
//! let count = PathSegment::System(SystemSegment::new("$count", None));
//! let orders = PathSegment::Regular(RegularSegment::new(
//!     "Orders",
//!     vec![NamedValue::named("Id", "5")],
//!     Some(count),
//! ));
//! let head = PathSegment::Regular(RegularSegment::new("Customers", vec![], Some(orders)));
//!
//! assert_eq!(head.len(), 3);
//! assert_eq!(head.to_string(), "Customers/Orders(Id=5)/$count");
//! ```

use std::fmt;

use serde::ser::{Serialize, Serializer};

/// A key predicate attached to a regular segment.
///
/// `name` is absent for positional keys such as `Orders(5)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct NamedValue {
    pub name: Option<String>,
    pub value: String,
}

impl NamedValue {
    /// Creates a named key predicate (`Id=5`).
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    /// Creates a positional key predicate (`5`).
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}={}", name, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// A regular path step: an entity set, navigation or property name, with
/// optional key predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularSegment {
    identifier: String,
    named_values: Vec<NamedValue>,
    next: Option<Box<PathSegment>>,
}

impl RegularSegment {
    /// Creates a regular segment.
    ///
    /// The identifier may be empty; such segments are carried through every
    /// operation like any other payload.
    pub fn new(
        identifier: impl Into<String>,
        named_values: Vec<NamedValue>,
        next: Option<PathSegment>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            named_values,
            next: next.map(Box::new),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Key predicates in the order they were written.
    pub fn named_values(&self) -> &[NamedValue] {
        &self.named_values
    }

    pub fn next(&self) -> Option<&PathSegment> {
        self.next.as_deref()
    }

    /// A regular segment is qualified when its identifier contains a dot,
    /// e.g. `Default.Container.Customers` or `NS.SpecialOrder`.
    pub fn is_namespace_or_container_qualified(&self) -> bool {
        self.identifier.contains('.')
    }
}

/// A protocol-reserved path token such as `$count`, `$ref` or `$value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSegment {
    identifier: String,
    next: Option<Box<PathSegment>>,
}

impl SystemSegment {
    /// Creates a system segment.
    pub fn new(identifier: impl Into<String>, next: Option<PathSegment>) -> Self {
        Self {
            identifier: identifier.into(),
            next: next.map(Box::new),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn next(&self) -> Option<&PathSegment> {
        self.next.as_deref()
    }

    /// System segments are never namespace or container qualified.
    pub fn is_namespace_or_container_qualified(&self) -> bool {
        false
    }
}

/// One step of a resource path.
///
/// The variant set is closed: every algorithm over a chain handles exactly
/// these two shapes, usually through [`PathSegment::accept`].
///
/// `Clone`, `PartialEq` and `Debug` walk the chain in a loop, so they hold up
/// on chains of any length.
pub enum PathSegment {
    Regular(RegularSegment),
    System(SystemSegment),
}

impl PathSegment {
    pub fn identifier(&self) -> &str {
        match self {
            PathSegment::Regular(segment) => segment.identifier(),
            PathSegment::System(segment) => segment.identifier(),
        }
    }

    /// The successor toward the end of the path, or `None` at the tail.
    pub fn next(&self) -> Option<&PathSegment> {
        match self {
            PathSegment::Regular(segment) => segment.next(),
            PathSegment::System(segment) => segment.next(),
        }
    }

    /// Key predicates; always empty for system segments.
    pub fn named_values(&self) -> &[NamedValue] {
        match self {
            PathSegment::Regular(segment) => segment.named_values(),
            PathSegment::System(_) => &[],
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, PathSegment::System(_))
    }

    pub fn is_namespace_or_container_qualified(&self) -> bool {
        match self {
            PathSegment::Regular(segment) => segment.is_namespace_or_container_qualified(),
            PathSegment::System(segment) => segment.is_namespace_or_container_qualified(),
        }
    }

    /// Iterates over this node and every node after it.
    pub fn iter(&self) -> Segments<'_> {
        Segments {
            current: Some(self),
        }
    }

    /// Number of nodes in the chain starting here. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Copies this node alone, with `next` as its successor.
    pub(crate) fn with_next(&self, next: Option<PathSegment>) -> PathSegment {
        match self {
            PathSegment::Regular(segment) => PathSegment::Regular(RegularSegment::new(
                segment.identifier(),
                segment.named_values().to_vec(),
                next,
            )),
            PathSegment::System(segment) => {
                PathSegment::System(SystemSegment::new(segment.identifier(), next))
            }
        }
    }

    /// Compares variant and payload of this node only, ignoring successors.
    fn same_node(&self, other: &PathSegment) -> bool {
        self.is_system() == other.is_system()
            && self.identifier() == other.identifier()
            && self.named_values() == other.named_values()
    }

    fn next_mut(&mut self) -> &mut Option<Box<PathSegment>> {
        match self {
            PathSegment::Regular(segment) => &mut segment.next,
            PathSegment::System(segment) => &mut segment.next,
        }
    }
}

impl Drop for PathSegment {
    // Unlink successors one at a time; the default drop glue would recurse
    // once per node.
    fn drop(&mut self) {
        let mut next = self.next_mut().take();
        while let Some(mut node) = next {
            next = node.next_mut().take();
        }
    }
}

impl Clone for PathSegment {
    fn clone(&self) -> Self {
        let rest: Vec<&PathSegment> = self.iter().skip(1).collect();
        let mut built: Option<PathSegment> = None;
        for node in rest.into_iter().rev() {
            built = Some(node.with_next(built));
        }
        self.with_next(built)
    }
}

impl PartialEq for PathSegment {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) if a.same_node(b) => continue,
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl Eq for PathSegment {}

/// Debug view of one node without its successor.
struct NodeDebug<'a>(&'a PathSegment);

impl fmt::Debug for NodeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PathSegment::Regular(segment) => f
                .debug_struct("Regular")
                .field("identifier", &segment.identifier())
                .field("named_values", &segment.named_values())
                .finish(),
            PathSegment::System(segment) => f
                .debug_struct("System")
                .field("identifier", &segment.identifier())
                .finish(),
        }
    }
}

impl fmt::Debug for PathSegment {
    /// Prints the chain from this node as a flat list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(NodeDebug)).finish()
    }
}

/// Iterator over the nodes of a chain, head first.
pub struct Segments<'a> {
    current: Option<&'a PathSegment>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a PathSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.current?;
        self.current = segment.next();
        Some(segment)
    }
}

impl<'a> IntoIterator for &'a PathSegment {
    type Item = &'a PathSegment;
    type IntoIter = Segments<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment.identifier())?;
            let values = segment.named_values();
            if !values.is_empty() {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")?;
            }
        }
        Ok(())
    }
}

/// Flat view of one node, used when a chain is serialized.
#[derive(serde::Serialize)]
struct SegmentRecord<'a> {
    kind: &'static str,
    identifier: &'a str,
    named_values: &'a [NamedValue],
}

impl Serialize for PathSegment {
    /// Serializes the whole chain from this node as a sequence of records.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|segment| SegmentRecord {
            kind: if segment.is_system() {
                "system"
            } else {
                "regular"
            },
            identifier: segment.identifier(),
            named_values: segment.named_values(),
        }))
    }
}

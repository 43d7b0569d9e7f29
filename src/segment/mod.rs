//! Resource path segments and their reversal.
//!
//! This module models the segment part of an OData resource path as a chain of
//! immutable nodes and provides the operation that flips a chain's direction
//! without touching the original.
//!
//! # Segment kinds
//!
//! - Regular segments: entity sets, navigation and property names, optionally
//!   with key predicates such as `(5)` or `(Id=5,Line='a')`
//! - System segments: reserved tokens such as `$count`, `$ref` and `$value`
//!
//! # Examples
//!
//! ```
//! use odatapath::segment::{reverse, Parser};
//!
//! let path = Parser::parse("Customers/Orders(Id=5)/$count").unwrap();
//! let reversed = reverse(Some(&path)).unwrap();
//! assert_eq!(reversed.to_string(), "$count/Orders(Id=5)/Customers");
//! // the original chain is untouched
//! assert_eq!(path.to_string(), "Customers/Orders(Id=5)/$count");
//! ```

pub mod error;
pub mod parser;
pub mod reverser;
pub mod token;
pub mod visitor;

pub use error::SegmentError;
pub use parser::Parser;
pub use reverser::{
    reverse, reverse_iterative, reverse_with, PathReverser, ReverseOptions, ReverseStrategy,
    DEFAULT_RECURSION_LIMIT, MAX_RECURSION_LIMIT,
};
pub use token::{NamedValue, PathSegment, RegularSegment, Segments, SystemSegment};
pub use visitor::PathSegmentVisitor;

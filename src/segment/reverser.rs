//! Reversal of segment chains.
//!
//! Reversing `Customers/Orders(Id=5)/$count` yields
//! `$count/Orders(Id=5)/Customers`. The input chain is only read; every node of
//! the result is freshly allocated, with the identifier and key predicates of
//! the node it mirrors.
//!
//! Two strategies produce identical chains:
//!
//! - [`PathReverser`] walks the chain once, recursing one level per node and
//!   threading the reversed suffix built so far.
//! - [`reverse_iterative`] does the same walk in a loop.
//!
//! [`reverse`] and [`reverse_with`] recurse only for chains within the
//! recursion limit, which is never above [`MAX_RECURSION_LIMIT`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::SegmentError;
use super::token::{PathSegment, RegularSegment, SystemSegment};
use super::visitor::PathSegmentVisitor;

/// Default number of segments above which recursion is not attempted.
pub const DEFAULT_RECURSION_LIMIT: usize = 256;

/// Upper bound on any configured recursion limit.
pub const MAX_RECURSION_LIMIT: usize = 1024;

/// How a chain is walked while reversing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReverseStrategy {
    /// One recursion level per segment, through [`PathReverser`].
    #[default]
    Recursive,
    /// A single loop with no recursion.
    Iterative,
}

/// Options for [`reverse_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverseOptions {
    pub strategy: ReverseStrategy,
    /// Chains longer than this are reversed iteratively even when
    /// `strategy` is `Recursive`. Values above [`MAX_RECURSION_LIMIT`] are
    /// treated as `MAX_RECURSION_LIMIT`.
    pub recursion_limit: usize,
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            strategy: ReverseStrategy::Recursive,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// Visitor that reverses the chain starting at the visited node.
///
/// `built_suffix` holds everything reversed before the visited node; it is
/// absent on the first call.
pub struct PathReverser {
    built_suffix: Option<PathSegment>,
}

impl PathReverser {
    /// Creates a reverser for the head of a chain.
    pub fn new() -> Self {
        Self { built_suffix: None }
    }

    fn with_suffix(built_suffix: PathSegment) -> Self {
        Self {
            built_suffix: Some(built_suffix),
        }
    }

    /// Continues with the next original node, or finishes at the tail.
    fn build_next_step(next: Option<&PathSegment>, reversed: PathSegment) -> PathSegment {
        match next {
            Some(next_level) => next_level.accept(PathReverser::with_suffix(reversed)),
            None => reversed,
        }
    }
}

impl Default for PathReverser {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSegmentVisitor for PathReverser {
    type Output = PathSegment;

    fn visit_regular(self, segment: &RegularSegment) -> PathSegment {
        let reversed = PathSegment::Regular(RegularSegment::new(
            segment.identifier(),
            segment.named_values().to_vec(),
            self.built_suffix,
        ));
        Self::build_next_step(segment.next(), reversed)
    }

    fn visit_system(self, segment: &SystemSegment) -> PathSegment {
        let reversed =
            PathSegment::System(SystemSegment::new(segment.identifier(), self.built_suffix));
        Self::build_next_step(segment.next(), reversed)
    }
}

fn reverse_recursive(head: &PathSegment) -> PathSegment {
    head.accept(PathReverser::new())
}

fn reverse_looped(head: &PathSegment) -> PathSegment {
    let mut built = head.with_next(None);
    for segment in head.iter().skip(1) {
        built = segment.with_next(Some(built));
    }
    built
}

/// Reverses the chain starting at `head` with the default options.
///
/// Chains within [`DEFAULT_RECURSION_LIMIT`] go through [`PathReverser`];
/// longer ones are reversed iteratively. Returns
/// [`SegmentError::MissingArgument`] when `head` is `None`.
pub fn reverse(head: Option<&PathSegment>) -> Result<PathSegment, SegmentError> {
    reverse_with(head, &ReverseOptions::default())
}

/// Reverses the chain starting at `head` without recursion.
pub fn reverse_iterative(head: Option<&PathSegment>) -> Result<PathSegment, SegmentError> {
    let head = head.ok_or(SegmentError::MissingArgument { name: "head" })?;
    Ok(reverse_looped(head))
}

/// Reverses the chain starting at `head` using the configured strategy.
pub fn reverse_with(
    head: Option<&PathSegment>,
    options: &ReverseOptions,
) -> Result<PathSegment, SegmentError> {
    let head = head.ok_or(SegmentError::MissingArgument { name: "head" })?;
    Ok(reverse_by(head, options))
}

fn reverse_by(head: &PathSegment, options: &ReverseOptions) -> PathSegment {
    let limit = options.recursion_limit.min(MAX_RECURSION_LIMIT);
    let strategy = match options.strategy {
        ReverseStrategy::Recursive if head.iter().nth(limit).is_some() => {
            debug!(limit, "chain exceeds recursion limit, reversing iteratively");
            ReverseStrategy::Iterative
        }
        strategy => strategy,
    };
    debug!(?strategy, "reversing path");
    match strategy {
        ReverseStrategy::Recursive => reverse_recursive(head),
        ReverseStrategy::Iterative => reverse_looped(head),
    }
}

impl PathSegment {
    /// Returns a reversed copy of the chain starting at this node.
    pub fn reversed(&self) -> PathSegment {
        reverse_by(self, &ReverseOptions::default())
    }
}

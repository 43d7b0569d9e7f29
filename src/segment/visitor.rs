//! Double dispatch over the two segment variants.

use super::token::{PathSegment, RegularSegment, SystemSegment};

/// An operation defined for both segment variants.
///
/// The visitor is taken by value so that it can move owned state into
/// whatever it builds.
pub trait PathSegmentVisitor {
    type Output;

    fn visit_regular(self, segment: &RegularSegment) -> Self::Output;

    fn visit_system(self, segment: &SystemSegment) -> Self::Output;
}

impl PathSegment {
    /// Calls the visitor method matching this node's variant.
    pub fn accept<V: PathSegmentVisitor>(&self, visitor: V) -> V::Output {
        match self {
            PathSegment::Regular(segment) => visitor.visit_regular(segment),
            PathSegment::System(segment) => visitor.visit_system(segment),
        }
    }
}

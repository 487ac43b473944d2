//! Identities of bodies, points and frames.
//!
//! The symbolic representation of spatial quantities carries no numbers, only the identities of the
//! bodies, frames and points they refer to. Identities are interned into the [`Identities`] arena
//! owned by the chain description and handed out as small `Copy` handles, so checking that two
//! quantities are composable is a plain index comparison.

use std::fmt;

/// A rigid body (link) of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(u32);

/// A point fixed in some body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointId(u32);

/// A coordinate frame. The handle carries the frame origin so screw checks need no lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId {
    index: u32,
    origin: PointId,
}

impl FrameId {
    /// The point at the origin of this frame.
    pub fn origin(&self) -> PointId {
        self.origin
    }
}

/// Arena of names for bodies, points and frames.
#[derive(Debug, Clone, Default)]
pub struct Identities {
    bodies: Vec<String>,
    points: Vec<String>,
    frames: Vec<String>,
    frame_origins: Vec<PointId>,
}

impl Identities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, name: &str) -> BodyId {
        self.bodies.push(name.to_string());
        BodyId((self.bodies.len() - 1) as u32)
    }

    pub fn add_point(&mut self, name: &str) -> PointId {
        self.points.push(name.to_string());
        PointId((self.points.len() - 1) as u32)
    }

    /// Registers a frame whose origin is the given point.
    pub fn add_frame(&mut self, name: &str, origin: PointId) -> FrameId {
        self.frames.push(name.to_string());
        self.frame_origins.push(origin);
        FrameId { index: (self.frames.len() - 1) as u32, origin }
    }

    /// Registers a frame together with a fresh origin point named `<name>_origin`.
    pub fn add_frame_with_origin(&mut self, name: &str) -> FrameId {
        let origin = self.add_point(&format!("{}_origin", name));
        self.add_frame(name, origin)
    }

    pub fn body_name(&self, body: BodyId) -> &str {
        self.bodies.get(body.0 as usize).map_or("?", |s| s.as_str())
    }

    pub fn point_name(&self, point: PointId) -> &str {
        self.points.get(point.0 as usize).map_or("?", |s| s.as_str())
    }

    pub fn frame_name(&self, frame: FrameId) -> &str {
        self.frames.get(frame.index as usize).map_or("?", |s| s.as_str())
    }

    /// Looks up a body by name.
    pub fn body(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b == name).map(|i| BodyId(i as u32))
    }

    /// Looks up a frame by name.
    pub fn frame(&self, name: &str) -> Option<FrameId> {
        self.frames.iter().position(|f| f == name).map(|i| FrameId {
            index: i as u32,
            origin: self.frame_origins[i],
        })
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Raised by the symbolic variant of an operation when its operands do not refer to compatible
/// bodies, frames or points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMismatch {
    /// The operation that rejected its operands.
    pub operation: &'static str,
    /// The identity rule that was violated.
    pub rule: &'static str,
}

impl TagMismatch {
    pub(crate) fn new(operation: &'static str, rule: &'static str) -> Self {
        TagMismatch { operation, rule }
    }
}

impl fmt::Display for TagMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.rule)
    }
}

impl std::error::Error for TagMismatch {}

/// Returns `Err` built from `operation` and `rule` unless `condition` holds.
pub(crate) fn require(condition: bool, operation: &'static str, rule: &'static str)
                      -> Result<(), TagMismatch> {
    if condition {
        Ok(())
    } else {
        Err(TagMismatch::new(operation, rule))
    }
}

/// Pairs a tagged value with the arena that can resolve its names, for printing.
pub struct Named<'a, T> {
    pub value: &'a T,
    pub identities: &'a Identities,
}

impl<'a, T> Named<'a, T> {
    pub fn new(value: &'a T, identities: &'a Identities) -> Self {
        Named { value, identities }
    }
}

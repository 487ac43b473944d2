//! Serial kinematic chain description.

use nalgebra::Matrix3;
use tracing::debug;

use crate::achd_frames::ChainFrames;
use crate::chain_error::ChainError;
use crate::chain_iterator::ChainIterator;
use crate::geometry::Pose;
use crate::geometry_tags::PoseTag;
use crate::identity::{BodyId, FrameId, Identities};
use crate::joint::{Joint, JointFrames};
use crate::mechanics::RigidBodyInertia;
use crate::mechanics_tags::RbiTag;

/// Tolerance for orthonormality of attachment rotations and symmetry of inertias.
const VALIDATION_TOLERANCE: f64 = 1e-9;

/// A joint together with the link it moves, attached to the predecessor link by a fixed pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Fixed pose from the predecessor's root frame to the frame the joint is mounted on.
    pub attachment: Pose,
    pub attachment_frames: PoseTag,
    pub joint: Joint,
    pub joint_frames: JointFrames,
    /// Inertia of the moved link, about the origin of the joint's target frame.
    pub inertia: RigidBodyInertia,
    pub inertia_frames: RbiTag,
}

/// An ordered, immutable sequence of segments from the base to the end effector.
///
/// Construction checks the numbers and runs the hybrid dynamics once on identity tags, so a
/// chain that exists is known to be frame-consistent.
#[derive(Debug, Clone)]
pub struct KinematicChain {
    identities: Identities,
    segments: Vec<Segment>,
    frames: ChainFrames,
}

impl KinematicChain {
    pub fn new(identities: Identities, segments: Vec<Segment>) -> Result<Self, ChainError> {
        if segments.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        for (i, segment) in segments.iter().enumerate() {
            validate_segment(i, segment)?;
        }
        validate_tip(segments.len() - 1, &segments[segments.len() - 1])?;

        let frames = ChainFrames::derive(&segments)?;
        debug!("kinematic chain of {} segments, {} bodies, {} frames",
            segments.len(), identities.body_count(), identities.frame_count());

        Ok(KinematicChain { identities, segments, frames })
    }

    /// Number of segments (joints, and bodies not counting the base).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    pub fn identities(&self) -> &Identities {
        &self.identities
    }

    /// Identity tags of every quantity the dynamics computes for this chain.
    pub fn frames(&self) -> &ChainFrames {
        &self.frames
    }

    pub fn iter(&self) -> ChainIterator<'_> {
        ChainIterator::new(self)
    }

    pub fn base_body(&self) -> BodyId {
        self.segments[0].attachment_frames.reference_body
    }

    pub fn base_frame(&self) -> FrameId {
        self.segments[0].attachment_frames.reference_frame
    }

    pub fn end_effector_body(&self) -> BodyId {
        self.segments[self.len() - 1].joint_frames.target_body
    }

    pub fn end_effector_frame(&self) -> FrameId {
        self.segments[self.len() - 1].joint_frames.target_frame
    }
}

fn validate_segment(index: usize, segment: &Segment) -> Result<(), ChainError> {
    let e = &segment.attachment.rotation;
    let t = &segment.attachment.translation;
    if !e.iter().chain(t.iter()).all(|v| v.is_finite()) {
        return Err(ChainError::InvalidPose(format!("segment {}: attachment must be finite", index)));
    }
    if (e.transpose() * e - Matrix3::identity()).amax() > VALIDATION_TOLERANCE || e.determinant() <= 0.0 {
        return Err(ChainError::InvalidPose(format!(
            "segment {}: attachment rotation is not a proper rotation", index)));
    }

    let m = &segment.inertia;
    if !(m.zeroth_moment.is_finite() && m.zeroth_moment >= 0.0) {
        return Err(ChainError::InvalidInertia(format!(
            "segment {}: mass must be finite and non-negative (got {})", index, m.zeroth_moment)));
    }
    if !m.first_moment.iter().chain(m.second_moment.iter()).all(|v| v.is_finite()) {
        return Err(ChainError::InvalidInertia(format!("segment {}: moments must be finite", index)));
    }
    if !m.is_symmetric(VALIDATION_TOLERANCE) {
        return Err(ChainError::InvalidInertia(format!(
            "segment {}: second moment of mass must be symmetric", index)));
    }
    let smallest = m.second_moment.symmetric_eigenvalues().min();
    if smallest < -VALIDATION_TOLERANCE {
        return Err(ChainError::InvalidInertia(format!(
            "segment {}: second moment of mass must be positive semi-definite (eigenvalue {})",
            index, smallest)));
    }

    match segment.joint {
        Joint::Revolute(j) => {
            if !(j.inertia.is_finite() && j.inertia >= 0.0) {
                return Err(ChainError::InvalidInertia(format!(
                    "segment {}: joint inertia must be finite and non-negative (got {})", index, j.inertia)));
            }
        }
    }
    Ok(())
}

/// Inner links may be massless, but the last joint must move something: its apparent inertia
/// is the link's own inertia about the axis plus the rotor inertia.
fn validate_tip(index: usize, segment: &Segment) -> Result<(), ChainError> {
    match segment.joint {
        Joint::Revolute(j) => {
            let k = j.axis.index();
            let d = segment.inertia.second_moment[(k, k)] + j.inertia;
            if !(d > 0.0) {
                return Err(ChainError::InvalidInertia(format!(
                    "segment {}: apparent inertia of the last joint about {} is zero", index, j.axis)));
            }
        }
    }
    Ok(())
}

/// Builds a chain with the conventional naming: bodies `link_0` (base) to `link_N`, each body
/// with a `link_i_root` frame and, except the last one, a `link_i_tip` frame the next joint is
/// mounted on.
pub struct ChainBuilder {
    identities: Identities,
    segments: Vec<Segment>,
    body: BodyId,
    root: FrameId,
}

impl ChainBuilder {
    pub fn new() -> Self {
        let mut identities = Identities::new();
        let body = identities.add_body("link_0");
        let root = identities.add_frame_with_origin("link_0_root");
        ChainBuilder { identities, segments: Vec::new(), body, root }
    }

    /// Appends a joint mounted on the current last link at `attachment`, moving a new link
    /// with the given inertia.
    pub fn segment(mut self, attachment: Pose, joint: Joint, inertia: RigidBodyInertia) -> Self {
        let i = self.segments.len();
        let tip = self.identities.add_frame_with_origin(&format!("link_{}_tip", i));
        let body = self.identities.add_body(&format!("link_{}", i + 1));
        let root = self.identities.add_frame_with_origin(&format!("link_{}_root", i + 1));

        self.segments.push(Segment {
            attachment,
            attachment_frames: PoseTag::new(self.body, tip, self.body, self.root),
            joint,
            joint_frames: JointFrames::new(body, root, self.body, tip),
            inertia,
            inertia_frames: RbiTag::at_origin(body, root),
        });
        self.body = body;
        self.root = root;
        self
    }

    pub fn build(mut self) -> Result<KinematicChain, ChainError> {
        let tip = format!("link_{}_tip", self.segments.len());
        self.identities.add_frame_with_origin(&tip);
        KinematicChain::new(self.identities, self.segments)
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        ChainBuilder::new()
    }
}

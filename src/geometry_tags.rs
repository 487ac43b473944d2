//! Symbolic representation of poses, twists and acceleration twists.
//!
//! Tags carry only identities. Each operation checks that its operands are compatible and
//! produces the tags of the result; see [`crate::spatial_traits`] for the shared contract.

use std::fmt;

use crate::identity::{require, BodyId, FrameId, Named, PointId, TagMismatch};
use crate::spatial_traits::{Accumulate, Compose, Derive, Invert, SpatialAdd, TransformMotion};

/// Identities of a pose: maps the reference frame (fixed in the reference body) to the target
/// frame (fixed in the target body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseTag {
    pub target_body: BodyId,
    pub target_frame: FrameId,
    pub reference_body: BodyId,
    pub reference_frame: FrameId,
}

impl PoseTag {
    pub fn new(target_body: BodyId, target_frame: FrameId,
               reference_body: BodyId, reference_frame: FrameId) -> Self {
        PoseTag { target_body, target_frame, reference_body, reference_frame }
    }

    /// The identity pose of a frame onto itself.
    pub fn identity(body: BodyId, frame: FrameId) -> Self {
        PoseTag::new(body, frame, body, frame)
    }
}

impl Compose for PoseTag {
    type Output = Result<PoseTag, TagMismatch>;

    fn compose(&self, other: &PoseTag) -> Self::Output {
        const OP: &str = "pose_compose";
        require(self.reference_frame == other.target_frame, OP,
                "reference frame of the first pose must be the target frame of the second")?;
        require(self.reference_body == other.target_body, OP,
                "reference body of the first pose must be the target body of the second")?;
        Ok(PoseTag {
            target_body: self.target_body,
            target_frame: self.target_frame,
            reference_body: other.reference_body,
            reference_frame: other.reference_frame,
        })
    }
}

impl Invert for PoseTag {
    type Output = Result<PoseTag, TagMismatch>;

    fn inverse(&self) -> Self::Output {
        Ok(PoseTag::new(self.reference_body, self.reference_frame, self.target_body, self.target_frame))
    }
}

/// Identities of a twist: motion of the target body relative to the reference body, expressed
/// about `point` in `frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwistTag {
    pub target_body: BodyId,
    pub reference_body: BodyId,
    pub point: PointId,
    pub frame: FrameId,
}

/// Identities of an acceleration twist, with the same meaning as [`TwistTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccTwistTag {
    pub target_body: BodyId,
    pub reference_body: BodyId,
    pub point: PointId,
    pub frame: FrameId,
}

impl TwistTag {
    /// A screw twist: expressed about the origin of its frame.
    pub fn screw(target_body: BodyId, reference_body: BodyId, frame: FrameId) -> Self {
        TwistTag { target_body, reference_body, point: frame.origin(), frame }
    }

    pub fn is_screw(&self) -> bool {
        self.point == self.frame.origin()
    }
}

impl AccTwistTag {
    pub fn screw(target_body: BodyId, reference_body: BodyId, frame: FrameId) -> Self {
        AccTwistTag { target_body, reference_body, point: frame.origin(), frame }
    }

    pub fn is_screw(&self) -> bool {
        self.point == self.frame.origin()
    }
}

impl TransformMotion<PoseTag> for TwistTag {
    type Output = Result<TwistTag, TagMismatch>;

    fn transform_ref_to_tgt(&self, x: &PoseTag) -> Self::Output {
        const OP: &str = "twist_tf_ref_to_tgt";
        require(self.is_screw(), OP, "twist must be a screw twist")?;
        require(self.frame == x.reference_frame, OP,
                "twist must be expressed in the reference frame of the pose")?;
        Ok(TwistTag::screw(self.target_body, self.reference_body, x.target_frame))
    }
}

impl Accumulate for TwistTag {
    type Output = Result<TwistTag, TagMismatch>;

    fn accumulate(&self, other: &TwistTag) -> Self::Output {
        const OP: &str = "twist_accumulate";
        require(self.target_body == other.reference_body, OP,
                "target body of the first twist must be the reference body of the second")?;
        require(self.point == other.point, OP, "twists must be expressed about the same point")?;
        require(self.frame == other.frame, OP, "twists must be expressed in the same frame")?;
        Ok(TwistTag {
            target_body: other.target_body,
            reference_body: self.reference_body,
            point: self.point,
            frame: self.frame,
        })
    }
}

/// `xd1 × xd2`: both twists move the same body about the same point and frame. The result
/// inherits the bodies of `xd2`.
impl Derive<TwistTag> for TwistTag {
    type Output = Result<AccTwistTag, TagMismatch>;

    fn derive(&self, other: &TwistTag) -> Self::Output {
        const OP: &str = "twist_derive";
        require(self.target_body == other.target_body, OP, "twists must move the same body")?;
        require(self.point == other.point, OP, "twists must be expressed about the same point")?;
        require(self.frame == other.frame, OP, "twists must be expressed in the same frame")?;
        Ok(AccTwistTag {
            target_body: other.target_body,
            reference_body: other.reference_body,
            point: other.point,
            frame: other.frame,
        })
    }
}

impl TransformMotion<PoseTag> for AccTwistTag {
    type Output = Result<AccTwistTag, TagMismatch>;

    fn transform_ref_to_tgt(&self, x: &PoseTag) -> Self::Output {
        const OP: &str = "acc_twist_tf_ref_to_tgt";
        require(self.is_screw(), OP, "acceleration twist must be a screw twist")?;
        require(self.frame == x.reference_frame, OP,
                "acceleration twist must be expressed in the reference frame of the pose")?;
        Ok(AccTwistTag::screw(self.target_body, self.reference_body, x.target_frame))
    }
}

impl Accumulate for AccTwistTag {
    type Output = Result<AccTwistTag, TagMismatch>;

    fn accumulate(&self, other: &AccTwistTag) -> Self::Output {
        const OP: &str = "acc_twist_accumulate";
        require(self.target_body == other.reference_body, OP,
                "target body of the first acceleration twist must be the reference body of the second")?;
        require(self.point == other.point, OP, "acceleration twists must be expressed about the same point")?;
        require(self.frame == other.frame, OP, "acceleration twists must be expressed in the same frame")?;
        Ok(AccTwistTag {
            target_body: other.target_body,
            reference_body: self.reference_body,
            point: self.point,
            frame: self.frame,
        })
    }
}

impl AccTwistTag {
    fn same_as(&self, other: &AccTwistTag, op: &'static str) -> Result<AccTwistTag, TagMismatch> {
        require(self.target_body == other.target_body && self.reference_body == other.reference_body,
                op, "acceleration twists must relate the same bodies")?;
        require(self.point == other.point, op, "acceleration twists must be expressed about the same point")?;
        require(self.frame == other.frame, op, "acceleration twists must be expressed in the same frame")?;
        Ok(*self)
    }
}

impl SpatialAdd for AccTwistTag {
    type Output = Result<AccTwistTag, TagMismatch>;

    fn add(&self, other: &AccTwistTag) -> Self::Output {
        self.same_as(other, "acc_twist_add")
    }

    fn sub(&self, other: &AccTwistTag) -> Self::Output {
        self.same_as(other, "acc_twist_sub")
    }
}

impl Invert for AccTwistTag {
    type Output = Result<AccTwistTag, TagMismatch>;

    fn inverse(&self) -> Self::Output {
        Ok(*self)
    }
}

impl fmt::Display for Named<'_, PoseTag> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (x, ids) = (self.value, self.identities);
        write!(f, "pose {}@{} <- {}@{}",
               ids.frame_name(x.target_frame), ids.body_name(x.target_body),
               ids.frame_name(x.reference_frame), ids.body_name(x.reference_body))
    }
}

impl fmt::Display for Named<'_, TwistTag> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (xd, ids) = (self.value, self.identities);
        write!(f, "twist {} rel {} about {} in {}",
               ids.body_name(xd.target_body), ids.body_name(xd.reference_body),
               ids.point_name(xd.point), ids.frame_name(xd.frame))
    }
}

impl fmt::Display for Named<'_, AccTwistTag> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (xdd, ids) = (self.value, self.identities);
        write!(f, "acc_twist {} rel {} about {} in {}",
               ids.body_name(xdd.target_body), ids.body_name(xdd.reference_body),
               ids.point_name(xdd.point), ids.frame_name(xdd.frame))
    }
}

//! Symbolic representation of wrenches, momenta and inertias.

use std::fmt;

use crate::geometry_tags::{AccTwistTag, PoseTag, TwistTag};
use crate::identity::{require, BodyId, FrameId, Named, PointId, TagMismatch};
use crate::spatial_traits::{Derive, Invert, MapMotion, SpatialAdd, ToArticulated, TransformForce};

/// Identities of a wrench acting on `body`, expressed about `point` in `frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrenchTag {
    pub body: BodyId,
    pub point: PointId,
    pub frame: FrameId,
}

/// Identities of the momentum of `body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MomentumTag {
    pub body: BodyId,
    pub point: PointId,
    pub frame: FrameId,
}

/// Identities of a rigid-body inertia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RbiTag {
    pub body: BodyId,
    pub point: PointId,
    pub frame: FrameId,
}

/// Identities of an articulated-body inertia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbiTag {
    pub body: BodyId,
    pub point: PointId,
    pub frame: FrameId,
}

impl WrenchTag {
    /// A wrench expressed about the origin of its frame.
    pub fn at_origin(body: BodyId, frame: FrameId) -> Self {
        WrenchTag { body, point: frame.origin(), frame }
    }

    pub fn is_screw(&self) -> bool {
        self.point == self.frame.origin()
    }

    fn same_as(&self, other: &WrenchTag, op: &'static str) -> Result<WrenchTag, TagMismatch> {
        require(self.is_screw() && other.is_screw(), op,
                "wrenches must be expressed about the origin of their frame")?;
        require(self.body == other.body, op, "wrenches must act on the same body")?;
        require(self.point == other.point, op, "wrenches must be expressed about the same point")?;
        require(self.frame == other.frame, op, "wrenches must be expressed in the same frame")?;
        Ok(*self)
    }
}

impl RbiTag {
    pub fn at_origin(body: BodyId, frame: FrameId) -> Self {
        RbiTag { body, point: frame.origin(), frame }
    }
}

impl AbiTag {
    pub fn at_origin(body: BodyId, frame: FrameId) -> Self {
        AbiTag { body, point: frame.origin(), frame }
    }
}

impl TransformForce<PoseTag> for WrenchTag {
    type Output = Result<WrenchTag, TagMismatch>;

    fn transform_tgt_to_ref(&self, x: &PoseTag) -> Self::Output {
        const OP: &str = "wrench_tf_tgt_to_ref";
        require(self.is_screw(), OP, "wrench must be expressed about the origin of its frame")?;
        require(self.frame == x.target_frame, OP,
                "wrench must be expressed in the target frame of the pose")?;
        Ok(WrenchTag::at_origin(self.body, x.reference_frame))
    }
}

impl SpatialAdd for WrenchTag {
    type Output = Result<WrenchTag, TagMismatch>;

    fn add(&self, other: &WrenchTag) -> Self::Output {
        self.same_as(other, "wrench_add")
    }

    fn sub(&self, other: &WrenchTag) -> Self::Output {
        self.same_as(other, "wrench_sub")
    }
}

impl Invert for WrenchTag {
    type Output = Result<WrenchTag, TagMismatch>;

    fn inverse(&self) -> Self::Output {
        require(self.is_screw(), "wrench_invert",
                "wrench must be expressed about the origin of its frame")?;
        Ok(*self)
    }
}

impl Derive<MomentumTag> for TwistTag {
    type Output = Result<WrenchTag, TagMismatch>;

    fn derive(&self, p: &MomentumTag) -> Self::Output {
        const OP: &str = "momentum_derive";
        require(self.is_screw(), OP, "twist must be a screw twist")?;
        require(p.point == p.frame.origin(), OP, "momentum must be expressed about the origin of its frame")?;
        require(self.target_body == p.body, OP, "twist must move the body whose momentum it is")?;
        require(self.point == p.point, OP, "twist and momentum must be expressed about the same point")?;
        require(self.frame == p.frame, OP, "twist and momentum must be expressed in the same frame")?;
        Ok(WrenchTag { body: self.target_body, point: self.point, frame: self.frame })
    }
}

impl MapMotion<TwistTag> for RbiTag {
    type Output = Result<MomentumTag, TagMismatch>;

    fn map(&self, xd: &TwistTag) -> Self::Output {
        const OP: &str = "rbi_map_twist_to_momentum";
        require(xd.is_screw(), OP, "twist must be a screw twist")?;
        require(self.body == xd.target_body, OP, "twist must move the body of the inertia")?;
        require(self.point == xd.point, OP, "inertia and twist must be expressed about the same point")?;
        require(self.frame == xd.frame, OP, "inertia and twist must be expressed in the same frame")?;
        Ok(MomentumTag { body: xd.target_body, point: xd.point, frame: xd.frame })
    }
}

impl ToArticulated for RbiTag {
    type Output = Result<AbiTag, TagMismatch>;

    fn to_articulated(&self) -> Self::Output {
        Ok(AbiTag { body: self.body, point: self.point, frame: self.frame })
    }
}

impl TransformForce<PoseTag> for AbiTag {
    type Output = Result<AbiTag, TagMismatch>;

    fn transform_tgt_to_ref(&self, x: &PoseTag) -> Self::Output {
        const OP: &str = "abi_tf_tgt_to_ref";
        require(self.point == self.frame.origin(), OP,
                "inertia must be expressed about the origin of its frame")?;
        require(self.frame == x.target_frame, OP,
                "inertia must be expressed in the target frame of the pose")?;
        Ok(AbiTag::at_origin(self.body, x.reference_frame))
    }
}

impl SpatialAdd for AbiTag {
    type Output = Result<AbiTag, TagMismatch>;

    fn add(&self, other: &AbiTag) -> Self::Output {
        const OP: &str = "abi_add";
        require(self.body == other.body, OP, "inertias must belong to the same body")?;
        require(self.point == other.point, OP, "inertias must be expressed about the same point")?;
        require(self.frame == other.frame, OP, "inertias must be expressed in the same frame")?;
        Ok(*self)
    }

    fn sub(&self, other: &AbiTag) -> Self::Output {
        self.add(other)
    }
}

impl MapMotion<AccTwistTag> for AbiTag {
    type Output = Result<WrenchTag, TagMismatch>;

    fn map(&self, xdd: &AccTwistTag) -> Self::Output {
        const OP: &str = "abi_map_acc_twist_to_wrench";
        require(xdd.is_screw(), OP, "acceleration twist must be a screw twist")?;
        require(xdd.point == self.point, OP,
                "inertia and acceleration twist must be expressed about the same point")?;
        require(xdd.target_body == self.body, OP,
                "acceleration twist must move the body of the inertia")?;
        require(xdd.frame == self.frame, OP,
                "inertia and acceleration twist must be expressed in the same frame")?;
        Ok(WrenchTag { body: xdd.target_body, point: xdd.point, frame: xdd.frame })
    }
}

macro_rules! display_body_point_frame {
    ($tag:ty, $label:expr) => {
        impl fmt::Display for Named<'_, $tag> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                let (t, ids) = (self.value, self.identities);
                write!(f, "{} on {} about {} in {}", $label,
                       ids.body_name(t.body), ids.point_name(t.point), ids.frame_name(t.frame))
            }
        }
    };
}

display_body_point_frame!(WrenchTag, "wrench");
display_body_point_frame!(MomentumTag, "momentum");
display_body_point_frame!(RbiTag, "rbi");
display_body_point_frame!(AbiTag, "abi");

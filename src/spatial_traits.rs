//! Operation contract shared by the coordinate and the symbolic representation.
//!
//! Every spatial quantity exists twice: as numbers ([`crate::geometry::Pose`],
//! [`crate::mechanics::Wrench`], ...) and as identity tags ([`crate::geometry_tags::PoseTag`],
//! [`crate::mechanics_tags::WrenchTag`], ...). Both implement the traits below. The coordinate
//! implementation returns the numeric result directly; the symbolic implementation returns
//! `Result<Tag, TagMismatch>` and fails when the operands refer to incompatible bodies,
//! frames or points.
//!
//! Direction conventions follow Featherstone: a pose maps coordinates from its reference frame to
//! its target frame, motion quantities are transformed along the pose (reference to target),
//! force quantities against it (target to reference).

/// `X1 ∘ X2`. The reference of `self` must be the target of `other`.
pub trait Compose {
    type Output;
    fn compose(&self, other: &Self) -> Self::Output;
}

/// Algebraic inverse (pose) or sign inversion (acceleration twist, wrench).
pub trait Invert {
    type Output;
    fn inverse(&self) -> Self::Output;
}

/// Moves a motion quantity from the pose's reference frame to its target frame.
pub trait TransformMotion<P> {
    type Output;
    fn transform_ref_to_tgt(&self, pose: &P) -> Self::Output;
}

/// Moves a force or inertia quantity from the pose's target frame to its reference frame.
pub trait TransformForce<P> {
    type Output;
    fn transform_tgt_to_ref(&self, pose: &P) -> Self::Output;
}

/// Chains relative motion: `self` of body B relative to A, `other` of C relative to B gives C
/// relative to A.
pub trait Accumulate {
    type Output;
    fn accumulate(&self, other: &Self) -> Self::Output;
}

/// Addition and subtraction of quantities with identical tags.
pub trait SpatialAdd {
    type Output;
    fn add(&self, other: &Self) -> Self::Output;
    fn sub(&self, other: &Self) -> Self::Output;
}

/// Inertia applied to a motion quantity: RBI × twist is momentum, ABI × acceleration twist is
/// a wrench.
pub trait MapMotion<M> {
    type Output;
    fn map(&self, motion: &M) -> Self::Output;
}

/// Spatial cross products of a twist with a motion (`×`) or a momentum (`×*`).
pub trait Derive<Rhs> {
    type Output;
    fn derive(&self, rhs: &Rhs) -> Self::Output;
}

/// Lifts a rigid-body inertia into articulated-body form.
pub trait ToArticulated {
    type Output;
    fn to_articulated(&self) -> Self::Output;
}

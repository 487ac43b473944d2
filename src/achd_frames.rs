//! Hybrid dynamics on identity tags.
//!
//! Runs the same three sweeps as [`crate::achd`] but on the symbolic representation, once, when
//! the chain is built. Every operation checks its operands, so if this succeeds every numeric
//! operation the solver performs later combines quantities that belong together. The resulting
//! tags tell which body, point and frame each entry of the solver state refers to.

use tracing::trace;

use crate::chain::Segment;
use crate::chain_error::ChainError;
use crate::geometry_tags::{AccTwistTag, PoseTag, TwistTag};
use crate::identity::TagMismatch;
use crate::mechanics_tags::{AbiTag, WrenchTag};
use crate::spatial_traits::{
    Accumulate, Compose, Derive, Invert, MapMotion, SpatialAdd, ToArticulated, TransformForce,
    TransformMotion,
};

/// Tags of the solver state. Body-indexed arrays run 0 (base) ..= N, joint-indexed arrays
/// 0 ..= N-1, matching [`crate::solver_state::SolverState`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainFrames {
    pub x_rel: Vec<PoseTag>,
    pub x_tot: Vec<PoseTag>,
    pub xd: Vec<TwistTag>,
    pub xdd_bias: Vec<AccTwistTag>,
    pub xdd: Vec<AccTwistTag>,
    pub m_art: Vec<AbiTag>,
    pub f_bias_art: Vec<WrenchTag>,
    pub f_ff_art: Vec<WrenchTag>,
    /// Where external wrenches on each moving body must be expressed.
    pub f_ext: Vec<WrenchTag>,
    pub f_ext_art: Vec<WrenchTag>,
    /// Constraint wrenches; the entry at N is where the end-effector constraints are expressed.
    pub f_cstr_art: Vec<WrenchTag>,
}

impl ChainFrames {
    pub(crate) fn derive(segments: &[Segment]) -> Result<ChainFrames, ChainError> {
        let n = segments.len();
        let base = &segments[0].attachment_frames;
        let (base_body, base_frame) = (base.reference_body, base.reference_frame);
        let base_wrench = WrenchTag::at_origin(base_body, base_frame);

        let mut frames = ChainFrames {
            x_rel: Vec::with_capacity(n),
            x_tot: vec![PoseTag::identity(base_body, base_frame); n + 1],
            xd: vec![TwistTag::screw(base_body, base_body, base_frame); n + 1],
            xdd_bias: Vec::with_capacity(n),
            xdd: vec![AccTwistTag::screw(base_body, base_body, base_frame); n + 1],
            m_art: vec![AbiTag::at_origin(base_body, base_frame); n + 1],
            f_bias_art: vec![base_wrench; n + 1],
            f_ff_art: vec![base_wrench; n + 1],
            f_ext: Vec::with_capacity(n),
            f_ext_art: vec![base_wrench; n + 1],
            f_cstr_art: vec![base_wrench; n + 1],
        };

        let at = |i: usize| move |mismatch: TagMismatch| ChainError::FrameMismatch { segment: i - 1, mismatch };

        for i in 1..=n {
            frames.outward_kinematics(i, &segments[i - 1]).map_err(at(i))?;
        }
        let ee = &segments[n - 1].joint_frames;
        frames.f_ff_art[n] = WrenchTag::at_origin(ee.target_body, ee.target_frame);
        frames.f_cstr_art[n] = WrenchTag::at_origin(ee.target_body, ee.target_frame);

        for i in (1..=n).rev() {
            frames.inward_accumulation(i, &segments[i - 1]).map_err(at(i))?;
        }
        for i in 1..=n {
            frames.outward_accelerations(i, &segments[i - 1]).map_err(at(i))?;
        }
        Ok(frames)
    }

    fn outward_kinematics(&mut self, i: usize, segment: &Segment) -> Result<(), TagMismatch> {
        let joint = &segment.joint_frames;

        let x_rel = joint.fpk().compose(&segment.attachment_frames)?;
        self.x_tot[i] = x_rel.compose(&self.x_tot[i - 1])?;
        self.x_rel.push(x_rel);

        let xd_tf = self.xd[i - 1].transform_ref_to_tgt(&x_rel)?;
        self.xd[i] = xd_tf.accumulate(&joint.fvk())?;
        self.xdd_bias.push(joint.inertial_acceleration(&self.xd[i])?);

        self.m_art[i] = segment.inertia_frames.to_articulated()?;
        let p = segment.inertia_frames.map(&self.xd[i])?;
        self.f_bias_art[i] = self.xd[i].derive(&p)?;

        let f_ext = WrenchTag::at_origin(segment.inertia_frames.body, segment.inertia_frames.frame);
        self.f_ext.push(f_ext);
        self.f_ext_art[i] = f_ext.inverse()?;
        Ok(())
    }

    fn inward_accumulation(&mut self, i: usize, segment: &Segment) -> Result<(), TagMismatch> {
        let joint = &segment.joint_frames;
        let x_rel = &self.x_rel[i - 1];
        let m = self.m_art[i];

        let m_app = joint.project_inertia(&m)?;
        self.m_art[i - 1] = self.m_art[i - 1].add(&m_app.transform_tgt_to_ref(x_rel)?)?;

        let f_bias_eom = m.map(&self.xdd_bias[i - 1])?.add(&self.f_bias_art[i])?;
        let f_bias_app = joint.project_wrench(&m, &f_bias_eom)?;
        self.f_bias_art[i - 1] = self.f_bias_art[i - 1].add(&f_bias_app.transform_tgt_to_ref(x_rel)?)?;

        let f_ff_app = joint.project_wrench(&m, &self.f_ff_art[i])?.add(&joint.ffd(&m)?)?;
        self.f_ff_art[i - 1] = f_ff_app.transform_tgt_to_ref(x_rel)?;

        let f_ext_app = joint.project_wrench(&m, &self.f_ext_art[i])?;
        self.f_ext_art[i - 1] = self.f_ext_art[i - 1].add(&f_ext_app.transform_tgt_to_ref(x_rel)?)?;

        let f_cstr_app = joint.project_wrench(&m, &self.f_cstr_art[i])?;
        self.f_cstr_art[i - 1] = f_cstr_app.transform_tgt_to_ref(x_rel)?;
        joint.decomp_e_cstr(&m, &self.f_cstr_art[i])?;

        trace!("segment {} frames consistent inward", i - 1);
        Ok(())
    }

    fn outward_accelerations(&mut self, i: usize, segment: &Segment) -> Result<(), TagMismatch> {
        let joint = &segment.joint_frames;
        let x_rel = &self.x_rel[i - 1];
        let xdd_bias = &self.xdd_bias[i - 1];

        let xdd_tf = self.xdd[i - 1].transform_ref_to_tgt(x_rel)?;
        let xdd_nact = xdd_tf.accumulate(xdd_bias)?;
        let f_bias_nact = self.m_art[i].map(&xdd_nact)?.add(&self.f_bias_art[i])?;

        joint.ifk(&f_bias_nact)?;
        joint.ifk(&self.f_ff_art[i])?;
        joint.ifk(&self.f_ext_art[i])?;
        joint.ifk(&self.f_cstr_art[i])?;

        let xdd_net = joint.fak().add(xdd_bias)?;
        self.xdd[i] = xdd_tf.accumulate(&xdd_net)?;
        Ok(())
    }
}

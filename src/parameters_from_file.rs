//! Supports reading chain descriptions from YAML file (optional)

use std::path::Path;

use yaml_rust2::{Yaml, YamlLoader};

use crate::chain_error::ChainError;
use crate::joint::JointAxis;
use crate::parameters::{ChainParameters, SegmentParameters};
use crate::solver_state::GRAVITY;

const IDENTITY: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

impl ChainParameters {
    /// Read the chain description from YAML file. YAML file like this is supported:
    /// ```yaml
    /// # Planar two-link arm
    /// gravity: [0.0, 0.0, 9.81]
    /// segments:
    ///   - joint:
    ///       type: revolute
    ///       axis: z
    ///       inertia: 1.0
    ///     link:
    ///       mass: 2.0
    ///       first_moment: [2.0, 0.0, 0.0]
    ///       second_moment: [[0, 0, 0], [0, 2, 0], [0, 0, 2]]
    ///   - attachment:
    ///       rotation: [[1, 0, 0], [0, 1, 0], [0, 0, 1]]
    ///       translation: [2.0, 0.0, 0.0]
    ///     joint:
    ///       axis: z
    ///     link:
    ///       mass: 2.0
    ///       first_moment: [2.0, 0.0, 0.0]
    ///       second_moment: [[0, 0, 0], [0, 2, 0], [0, 0, 2]]
    /// ```
    /// Gravity, the attachment (and each of its fields), the joint type and the joint inertia
    /// are optional; they default to standard gravity along +z, the identity pose, revolute and
    /// zero. The output of [`ChainParameters::to_yaml`] reads back unchanged.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ChainError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Same as [`ChainParameters::from_yaml_file`], from a string.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ChainError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ChainError::ParseError(format!("{}", e)))?;
        let doc = docs.first()
            .ok_or_else(|| ChainError::ParseError("empty YAML document".to_string()))?;

        let gravity = match &doc["gravity"] {
            Yaml::BadValue => [0.0, 0.0, GRAVITY],
            value => vector3(value, "gravity")?,
        };

        let segments = doc["segments"].as_vec()
            .ok_or_else(|| ChainError::MissingField("segments".to_string()))?;
        if segments.is_empty() {
            return Err(ChainError::EmptyChain);
        }

        let segments = segments.iter().enumerate()
            .map(|(i, segment)| parse_segment(i, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChainParameters { segments, gravity })
    }
}

fn parse_segment(index: usize, yaml: &Yaml) -> Result<SegmentParameters, ChainError> {
    let field = |name: &str| format!("segments[{}].{}", index, name);

    let attachment = &yaml["attachment"];
    let rotation = match &attachment["rotation"] {
        Yaml::BadValue => IDENTITY,
        value => matrix3(value, &field("attachment.rotation"))?,
    };
    let translation = match &attachment["translation"] {
        Yaml::BadValue => [0.0; 3],
        value => vector3(value, &field("attachment.translation"))?,
    };

    let joint = &yaml["joint"];
    if joint.is_badvalue() {
        return Err(ChainError::MissingField(field("joint")));
    }
    match joint["type"].as_str() {
        None | Some("revolute") => {}
        Some(other) => return Err(ChainError::ParseError(format!(
            "{}: unsupported joint type '{}' (only revolute is supported)", field("joint.type"), other))),
    }
    let axis_name = joint["axis"].as_str()
        .ok_or_else(|| ChainError::MissingField(field("joint.axis")))?;
    let axis = JointAxis::from_name(axis_name)
        .ok_or_else(|| ChainError::InvalidAxis(format!("{}: '{}'", field("joint.axis"), axis_name)))?;
    let joint_inertia = match &joint["inertia"] {
        Yaml::BadValue => 0.0,
        value => number(value, &field("joint.inertia"))?,
    };

    let link = &yaml["link"];
    if link.is_badvalue() {
        return Err(ChainError::MissingField(field("link")));
    }
    let mass = number(required(link, "mass", &field("link.mass"))?, &field("link.mass"))?;
    let first_moment = vector3(required(link, "first_moment", &field("link.first_moment"))?,
                               &field("link.first_moment"))?;
    let second_moment = matrix3(required(link, "second_moment", &field("link.second_moment"))?,
                                &field("link.second_moment"))?;

    Ok(SegmentParameters { rotation, translation, axis, joint_inertia, mass, first_moment, second_moment })
}

fn required<'a>(yaml: &'a Yaml, key: &str, name: &str) -> Result<&'a Yaml, ChainError> {
    match &yaml[key] {
        Yaml::BadValue => Err(ChainError::MissingField(name.to_string())),
        value => Ok(value),
    }
}

/// Reads a finite number. Integers are accepted where reals are expected.
fn number(yaml: &Yaml, name: &str) -> Result<f64, ChainError> {
    let value = match yaml {
        Yaml::Real(_) => yaml.as_f64(),
        Yaml::Integer(i) => Some(*i as f64),
        _ => None,
    }.ok_or_else(|| ChainError::ParseError(format!("{} must be a number", name)))?;

    if !value.is_finite() {
        return Err(ChainError::ParseError(format!("{} must be finite (got {})", name, value)));
    }
    Ok(value)
}

fn vector3(yaml: &Yaml, name: &str) -> Result<[f64; 3], ChainError> {
    let items = yaml.as_vec()
        .ok_or_else(|| ChainError::ParseError(format!("{} must be a list of 3 numbers", name)))?;
    if items.len() != 3 {
        return Err(ChainError::InvalidLength { expected: 3, found: items.len() });
    }
    let mut v = [0.0; 3];
    for (i, item) in items.iter().enumerate() {
        v[i] = number(item, &format!("{}[{}]", name, i))?;
    }
    Ok(v)
}

fn matrix3(yaml: &Yaml, name: &str) -> Result<[[f64; 3]; 3], ChainError> {
    let rows = yaml.as_vec()
        .ok_or_else(|| ChainError::ParseError(format!("{} must be a list of 3 rows", name)))?;
    if rows.len() != 3 {
        return Err(ChainError::InvalidLength { expected: 3, found: rows.len() });
    }
    let mut m = [[0.0; 3]; 3];
    for (i, row) in rows.iter().enumerate() {
        m[i] = vector3(row, &format!("{}[{}]", name, i))?;
    }
    Ok(m)
}

//! Animation clip model: bindings, curves and the clip storage trait.
//!
//! A clip is an insertion-ordered map from [`CurveBinding`] to [`Curve`].
//! Keyframe data is carried through untouched; only binding identity is ever
//! rewritten.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use animfix_api_core::{BindingPath, ComponentType};

use crate::error::ClipError;
use crate::ids::ClipId;

/// (path, target type, property). Unique within a clip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveBinding {
    pub path: BindingPath,
    #[serde(rename = "type")]
    pub target_type: ComponentType,
    pub property: String,
}

impl CurveBinding {
    pub fn new(
        path: BindingPath,
        target_type: impl Into<ComponentType>,
        property: impl Into<String>,
    ) -> Self {
        Self {
            path,
            target_type: target_type.into(),
            property: property.into(),
        }
    }

    /// Same type and property, different path.
    pub fn with_path(&self, path: BindingPath) -> Self {
        Self {
            path,
            target_type: self.target_type.clone(),
            property: self.property.clone(),
        }
    }

    /// Same path, different type and property.
    pub fn with_target(&self, target_type: ComponentType, property: String) -> Self {
        Self {
            path: self.path.clone(),
            target_type,
            property,
        }
    }
}

impl fmt::Display for CurveBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}.{}", self.path, self.target_type, self.property)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Scalar,
    ObjectReference,
}

impl CurveKind {
    /// Processing order used by every rewrite.
    pub const ALL: [CurveKind; 2] = [CurveKind::Scalar, CurveKind::ObjectReference];
}

/// Scalar keyframe. Tangents are preserved verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }
}

/// Opaque handle to a host object (asset id, guid, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(pub String);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectKeyframe {
    pub time: f32,
    pub object: Option<ObjectRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Curve {
    Scalar { keys: Vec<Keyframe> },
    ObjectReference { keys: Vec<ObjectKeyframe> },
}

impl Curve {
    pub fn scalar(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Curve::Scalar {
            keys: keys.into_iter().map(|(t, v)| Keyframe::new(t, v)).collect(),
        }
    }

    pub fn object_reference(keys: impl IntoIterator<Item = (f32, Option<ObjectRef>)>) -> Self {
        Curve::ObjectReference {
            keys: keys
                .into_iter()
                .map(|(time, object)| ObjectKeyframe { time, object })
                .collect(),
        }
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Scalar { .. } => CurveKind::Scalar,
            Curve::ObjectReference { .. } => CurveKind::ObjectReference,
        }
    }

    pub fn key_count(&self) -> usize {
        match self {
            Curve::Scalar { keys } => keys.len(),
            Curve::ObjectReference { keys } => keys.len(),
        }
    }
}

/// Clip storage provider. Adapters implement this over the host's clip
/// representation; [`AnimationClip`] is the in-memory implementation.
pub trait CurveStore {
    fn id(&self) -> &ClipId;

    /// Snapshot of the bindings carrying a curve of `kind`, in clip order.
    fn bindings(&self, kind: CurveKind) -> Vec<CurveBinding>;

    fn curve(&self, binding: &CurveBinding) -> Option<&Curve>;

    /// Set the curve for `binding`, returning the curve it replaced.
    fn set_curve(&mut self, binding: CurveBinding, curve: Curve) -> Option<Curve>;

    /// Remove and return the curve for `binding`.
    fn take_curve(&mut self, binding: &CurveBinding) -> Option<Curve>;

    fn contains(&self, binding: &CurveBinding) -> bool {
        self.curve(binding).is_some()
    }

    /// All bindings of both kinds.
    fn all_bindings(&self) -> Vec<CurveBinding> {
        let mut out = Vec::new();
        for kind in CurveKind::ALL {
            out.extend(self.bindings(kind));
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClipData", into = "ClipData")]
pub struct AnimationClip {
    id: ClipId,
    curves: IndexMap<CurveBinding, Curve>,
}

impl AnimationClip {
    pub fn new(id: impl Into<ClipId>) -> Self {
        Self {
            id: id.into(),
            curves: IndexMap::new(),
        }
    }

    /// Builder-style insert; a repeated binding replaces the earlier curve.
    pub fn with_curve(mut self, binding: CurveBinding, curve: Curve) -> Self {
        self.curves.insert(binding, curve);
        self
    }

    pub fn insert(&mut self, binding: CurveBinding, curve: Curve) -> Option<Curve> {
        self.curves.insert(binding, curve)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurveBinding, &Curve)> {
        self.curves.iter()
    }
}

impl CurveStore for AnimationClip {
    fn id(&self) -> &ClipId {
        &self.id
    }

    fn bindings(&self, kind: CurveKind) -> Vec<CurveBinding> {
        self.curves
            .iter()
            .filter(|(_, c)| c.kind() == kind)
            .map(|(b, _)| b.clone())
            .collect()
    }

    fn curve(&self, binding: &CurveBinding) -> Option<&Curve> {
        self.curves.get(binding)
    }

    fn set_curve(&mut self, binding: CurveBinding, curve: Curve) -> Option<Curve> {
        self.curves.insert(binding, curve)
    }

    fn take_curve(&mut self, binding: &CurveBinding) -> Option<Curve> {
        self.curves.shift_remove(binding)
    }
}

/// Serialized form: bindings as a list, since JSON object keys must be strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct ClipData {
    id: ClipId,
    #[serde(default)]
    curves: Vec<CurveEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CurveEntry {
    #[serde(flatten)]
    binding: CurveBinding,
    curve: Curve,
}

impl TryFrom<ClipData> for AnimationClip {
    type Error = ClipError;

    fn try_from(data: ClipData) -> Result<Self, Self::Error> {
        let mut curves = IndexMap::with_capacity(data.curves.len());
        for entry in data.curves {
            if curves.contains_key(&entry.binding) {
                return Err(ClipError::DuplicateBinding {
                    clip: data.id,
                    binding: entry.binding,
                });
            }
            curves.insert(entry.binding, entry.curve);
        }
        Ok(Self {
            id: data.id,
            curves,
        })
    }
}

impl From<AnimationClip> for ClipData {
    fn from(clip: AnimationClip) -> Self {
        ClipData {
            id: clip.id,
            curves: clip
                .curves
                .into_iter()
                .map(|(binding, curve)| CurveEntry { binding, curve })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(path: &str, ty: &str, prop: &str) -> CurveBinding {
        CurveBinding::new(BindingPath::parse(path).unwrap(), ty, prop)
    }

    #[test]
    fn bindings_are_split_by_kind_in_clip_order() {
        let clip = AnimationClip::new("Wave")
            .with_curve(b("Arm", "Transform", "x"), Curve::scalar([(0.0, 1.0)]))
            .with_curve(
                b("Body", "SkinnedMeshRenderer", "material"),
                Curve::object_reference([(0.0, Some(ObjectRef("mat-a".into())))]),
            )
            .with_curve(b("Arm", "Transform", "y"), Curve::scalar([(0.0, 2.0)]));
        let scalar = clip.bindings(CurveKind::Scalar);
        assert_eq!(scalar, vec![b("Arm", "Transform", "x"), b("Arm", "Transform", "y")]);
        assert_eq!(clip.bindings(CurveKind::ObjectReference).len(), 1);
        assert_eq!(clip.all_bindings().len(), 3);
    }

    #[test]
    fn take_curve_preserves_order_of_the_rest() {
        let mut clip = AnimationClip::new("c")
            .with_curve(b("a", "T", "x"), Curve::scalar([(0.0, 0.0)]))
            .with_curve(b("b", "T", "x"), Curve::scalar([(0.0, 0.0)]))
            .with_curve(b("c", "T", "x"), Curve::scalar([(0.0, 0.0)]));
        assert!(clip.take_curve(&b("a", "T", "x")).is_some());
        let order: Vec<String> = clip.iter().map(|(k, _)| k.path.to_string()).collect();
        assert_eq!(order, vec!["b", "c"]);
    }

    #[test]
    fn json_round_trip_and_duplicate_rejection() {
        let json = serde_json::json!({
            "id": "Walk",
            "curves": [
                { "path": "Hips", "type": "Transform", "property": "m_LocalPosition.y",
                  "curve": { "kind": "scalar", "keys": [ { "time": 0.0, "value": 1.0 } ] } }
            ]
        });
        let clip: AnimationClip = serde_json::from_value(json).unwrap();
        assert_eq!(clip.len(), 1);
        assert!(clip.contains(&b("Hips", "Transform", "m_LocalPosition.y")));

        let dup = serde_json::json!({
            "id": "Walk",
            "curves": [
                { "path": "Hips", "type": "T", "property": "x", "curve": { "kind": "scalar", "keys": [] } },
                { "path": "Hips", "type": "T", "property": "x", "curve": { "kind": "scalar", "keys": [] } }
            ]
        });
        assert!(serde_json::from_value::<AnimationClip>(dup).is_err());
    }

    #[test]
    fn binding_display() {
        assert_eq!(
            b("Hips/Spine", "Renderer", "color").to_string(),
            "Hips/Spine : Renderer.color"
        );
    }
}

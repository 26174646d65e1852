//! Object kinds and their persisted tags

use serde::{Deserialize, Serialize};

/// Every kind of object the arena can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Sphere,
    Domino,
    Ramp,
    Box,
    Seesaw,
    Mountain,
    Shrine,
    Road,
    Plank,
    Guardrail,
    Stairs,
    Trampoline,
    Goal,
    Penguin,
    Cow,
    Vehicle,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 16] = [
        ObjectKind::Sphere,
        ObjectKind::Domino,
        ObjectKind::Ramp,
        ObjectKind::Box,
        ObjectKind::Seesaw,
        ObjectKind::Mountain,
        ObjectKind::Shrine,
        ObjectKind::Road,
        ObjectKind::Plank,
        ObjectKind::Guardrail,
        ObjectKind::Stairs,
        ObjectKind::Trampoline,
        ObjectKind::Goal,
        ObjectKind::Penguin,
        ObjectKind::Cow,
        ObjectKind::Vehicle,
    ];

    /// Tag written to snapshots
    pub fn tag(self) -> &'static str {
        match self {
            ObjectKind::Sphere => "sphere",
            ObjectKind::Domino => "domino",
            ObjectKind::Ramp => "ramp",
            ObjectKind::Box => "box",
            ObjectKind::Seesaw => "seesaw",
            ObjectKind::Mountain => "mountain",
            ObjectKind::Shrine => "shrine",
            ObjectKind::Road => "road",
            ObjectKind::Plank => "plank",
            ObjectKind::Guardrail => "guardrail",
            ObjectKind::Stairs => "stairs",
            ObjectKind::Trampoline => "trampoline",
            ObjectKind::Goal => "goal",
            ObjectKind::Penguin => "penguin",
            ObjectKind::Cow => "cow",
            ObjectKind::Vehicle => "vehicle",
        }
    }

    /// Parse a snapshot tag; older files call spheres "ball" and the vehicle "train"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ball" => Some(ObjectKind::Sphere),
            "train" => Some(ObjectKind::Vehicle),
            _ => Self::ALL.iter().copied().find(|k| k.tag() == tag),
        }
    }

    /// Knocked-over instances right themselves
    pub fn is_returnable(self) -> bool {
        matches!(self, ObjectKind::Domino | ObjectKind::Guardrail)
    }

    /// Wandering background creatures
    pub fn is_agent(self) -> bool {
        matches!(self, ObjectKind::Penguin | ObjectKind::Cow)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse_back() {
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(ObjectKind::from_tag("ball"), Some(ObjectKind::Sphere));
        assert_eq!(ObjectKind::from_tag("train"), Some(ObjectKind::Vehicle));
        assert_eq!(ObjectKind::from_tag("spaceship"), None);
    }
}

//! Entity kind enum shared by the registry, the policy and the controllers.

/// What sort of agent an entity is.
///
/// Forklifts run the collision-avoidance policy and yield to everything;
/// workers are pedestrians with right of way.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityKind {
    Worker,
    Forklift,
}

impl EntityKind {
    /// Human-readable label, used in CSV columns and route files.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Worker   => "worker",
            EntityKind::Forklift => "forklift",
        }
    }

    /// Parse the label written by [`as_str`](Self::as_str).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "worker"   => Some(EntityKind::Worker),
            "forklift" => Some(EntityKind::Forklift),
            _          => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

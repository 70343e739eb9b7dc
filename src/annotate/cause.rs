//! Typed update causes and their wire labels.

use serde::{Deserialize, Serialize};

/// Why (and how) allocations of a task group are touched by a plan.
///
/// Serialises to the update-kind labels used as `Updates` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpdateCause {
    /// Allocations left untouched.
    #[serde(rename = "ignore")]
    Ignore,
    /// Allocations created.
    #[serde(rename = "create")]
    Create,
    /// Allocations destroyed.
    #[serde(rename = "destroy")]
    Destroy,
    /// Allocations migrated to other nodes.
    #[serde(rename = "migrate")]
    Migrate,
    /// Allocations updated without a restart.
    #[serde(rename = "in-place update")]
    InPlace,
    /// Allocations stopped and recreated.
    #[serde(rename = "create/destroy update")]
    Destructive,
}

impl UpdateCause {
    /// All causes, in label order.
    pub const ALL: [Self; 6] = [
        Self::Ignore,
        Self::Create,
        Self::Destroy,
        Self::Migrate,
        Self::InPlace,
        Self::Destructive,
    ];

    /// Update-kind label, as used for `Updates` keys.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Create => "create",
            Self::Destroy => "destroy",
            Self::Migrate => "migrate",
            Self::InPlace => "in-place update",
            Self::Destructive => "create/destroy update",
        }
    }

    /// Annotation attached to a field or task diff forced into this cause.
    ///
    /// Ignore and migrate never annotate a diff node.
    #[must_use]
    pub const fn annotation(self) -> Option<&'static str> {
        match self {
            Self::Create => Some("forces create"),
            Self::Destroy => Some("forces destroy"),
            Self::InPlace => Some("forces in-place update"),
            Self::Destructive => Some("forces create/destroy update"),
            Self::Ignore | Self::Migrate => None,
        }
    }

    /// Parses an annotation label.
    #[must_use]
    pub fn from_annotation(annotation: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.annotation() == Some(annotation))
    }
}

impl std::fmt::Display for UpdateCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

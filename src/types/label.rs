//! The closed set of labels the attribute cache knows about.

use serde::Serialize;

/// A label kind with a stable ordinal, used as a bit position in label masks.
///
/// Labels outside this enumeration can still be present on nodes; they are
/// answered by the store directly and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum LabelKind {
    /// Marks the root of the generated tree.
    Root = 0,
    /// Inner nodes reached through `HAS_A`.
    A = 1,
    /// Inner nodes reached through `HAS_B`.
    B = 2,
}

impl LabelKind {
    /// All kinds, in ordinal order.
    pub const ALL: [LabelKind; 3] = [LabelKind::Root, LabelKind::A, LabelKind::B];

    /// The bit position of this kind in a label mask.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Single-bit mask for this kind.
    pub fn mask(self) -> u8 {
        1 << self.ordinal()
    }

    /// The label name as stored on nodes.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// Look up a kind by its exact label name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Root" => Some(Self::Root),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for LabelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Membership of a node in each [`LabelKind`], one bit per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelBitmask(u8);

impl LabelBitmask {
    /// Build a mask from a node's label names; unknown labels are skipped.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let bits = labels
            .into_iter()
            .filter_map(LabelKind::from_name)
            .fold(0u8, |acc, kind| acc | kind.mask());
        Self(bits)
    }

    /// Whether the bit for `kind` is set.
    pub fn contains(self, kind: LabelKind) -> bool {
        self.0 & kind.mask() != 0
    }

    /// Raw bits.
    pub fn bits(self) -> u8 {
        self.0
    }
}

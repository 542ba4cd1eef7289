use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color of the center node of a related-idea graph
pub const CENTER_COLOR: &str = "#cbddf7";

/// Size used for every graph node
pub const NODE_SIZE: u32 = 11;

/// The closed set of coherence relations produced by the relation engine.
///
/// Variant order is the canonical display order: `Ord` follows declaration
/// order, so a `BTreeMap<RelationType, _>` iterates canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Equivalent,
    CauseIs,
    ConsequenceIs,
    Similarly,
    Additionally,
    ForExample,
    InterventionIs,
    TheOppositeIs,
}

impl RelationType {
    pub const ALL: [RelationType; 8] = [
        RelationType::Equivalent,
        RelationType::CauseIs,
        RelationType::ConsequenceIs,
        RelationType::Similarly,
        RelationType::Additionally,
        RelationType::ForExample,
        RelationType::InterventionIs,
        RelationType::TheOppositeIs,
    ];

    /// Name used in the data source
    pub fn wire_name(self) -> &'static str {
        match self {
            RelationType::Equivalent => "EQUIVALENT",
            RelationType::CauseIs => "CAUSE_IS",
            RelationType::ConsequenceIs => "CONSEQUENCE_IS",
            RelationType::Similarly => "SIMILARLY",
            RelationType::Additionally => "ADDITIONALLY",
            RelationType::ForExample => "FOR_EXAMPLE",
            RelationType::InterventionIs => "INTERVENTION_IS",
            RelationType::TheOppositeIs => "THE_OPPOSITE_IS",
        }
    }

    /// Human-readable name shown on the intermediate node
    pub fn label(self) -> &'static str {
        match self {
            RelationType::Equivalent => "EQUIVALENTS",
            RelationType::CauseIs => "CAUSES",
            RelationType::ConsequenceIs => "CONSEQUENCES",
            RelationType::Similarly => "SIMILARITIES",
            RelationType::Additionally => "ADDITIONALLY",
            RelationType::ForExample => "EXAMPLES",
            RelationType::InterventionIs => "INTERVENTIONS",
            RelationType::TheOppositeIs => "OPPOSITES",
        }
    }

    /// Fill color of the intermediate (relation) node
    pub fn intermediate_color(self) -> &'static str {
        match self {
            RelationType::Equivalent => "#ADD8E6",
            RelationType::CauseIs => "#FFA07A",
            RelationType::ConsequenceIs => "#90EE90",
            RelationType::Similarly => "#FFFFE0",
            RelationType::Additionally => "#E6E6FA",
            RelationType::ForExample => "#FFDAB9",
            RelationType::InterventionIs => "#FFB6C1",
            RelationType::TheOppositeIs => "#D3D3D3",
        }
    }

    /// Fill color of the leaf (linked sentence) nodes
    pub fn end_color(self) -> &'static str {
        match self {
            RelationType::Equivalent => "#00008B",
            RelationType::CauseIs => "#8B0000",
            RelationType::ConsequenceIs => "#006400",
            RelationType::Similarly => "#FFD700",
            RelationType::Additionally => "#800080",
            RelationType::ForExample => "#FF8C00",
            RelationType::InterventionIs => "#FF1493",
            RelationType::TheOppositeIs => "#A9A9A9",
        }
    }

    /// Reverse lookup of a leaf color, case-insensitive
    pub fn from_end_color(color: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.end_color().eq_ignore_ascii_case(color))
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.wire_name() == s)
            .ok_or_else(|| format!("unknown relation type '{}'", s))
    }
}

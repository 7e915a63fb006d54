//! Sales pipeline stages

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Phase of the sales process a deal currently occupies.
///
/// Stages form a labelled set rather than a strict sequence: any stage may
/// move to any other. Declaration order is the left-to-right presentation
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl_domain_enum_conversions!(Stage {
    Prospecting => "PROSPECTING",
    Qualification => "QUALIFICATION",
    Proposal => "PROPOSAL",
    Negotiation => "NEGOTIATION",
    ClosedWon => "CLOSED_WON",
    ClosedLost => "CLOSED_LOST",
});

impl Stage {
    /// All stages in presentation order.
    pub const ALL: [Stage; 6] = [
        Stage::Prospecting,
        Stage::Qualification,
        Stage::Proposal,
        Stage::Negotiation,
        Stage::ClosedWon,
        Stage::ClosedLost,
    ];

    /// Human readable column title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Prospecting => "Prospecting",
            Self::Qualification => "Qualification",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Won",
            Self::ClosedLost => "Lost",
        }
    }

    /// Accent colour used for badges and column headers.
    pub fn color(self) -> &'static str {
        match self {
            Self::Prospecting => "#1890ff",
            Self::Qualification => "#fa8c16",
            Self::Proposal => "#722ed1",
            Self::Negotiation => "#eb2f96",
            Self::ClosedWon => "#52c41a",
            Self::ClosedLost => "#8c8c8c",
        }
    }

    /// Whether the stage has a column on the interactive board.
    ///
    /// `ClosedLost` deals are still counted in summaries; they just have no
    /// drop target.
    pub fn is_on_board(self) -> bool {
        !matches!(self, Self::ClosedLost)
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_serde() {
        let json = serde_json::to_string(&Stage::ClosedWon).unwrap();
        assert_eq!(json, "\"CLOSED_WON\"");
        let parsed: Stage = serde_json::from_str("\"NEGOTIATION\"").unwrap();
        assert_eq!(parsed, Stage::Negotiation);
    }

    #[test]
    fn display_matches_wire_name() {
        for stage in Stage::ALL {
            let wire = serde_json::to_value(stage).unwrap();
            assert_eq!(wire.as_str(), Some(stage.to_string().as_str()));
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("closed_lost".parse::<Stage>().unwrap(), Stage::ClosedLost);
        assert!("WON".parse::<Stage>().is_err());
    }

    #[test]
    fn only_lost_is_hidden_from_board() {
        let hidden: Vec<Stage> = Stage::ALL.into_iter().filter(|s| !s.is_on_board()).collect();
        assert_eq!(hidden, vec![Stage::ClosedLost]);
    }

    #[test]
    fn presentation_order_matches_declaration() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
    }
}

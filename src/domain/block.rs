//! Form blocks and the enumerated values their widgets offer.
//!
//! The personal-information block is shared by every submission and is not
//! modelled here; [`EventBlock`] covers the three submittable blocks, each
//! with its own fixed list of [`EventName`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::SurveyError;

/// One of the three submittable event blocks of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EventBlock {
    /// National events.
    National,
    /// International events of the olympic cycle.
    OlympicCycle,
    /// International championships.
    Championship,
}

impl EventBlock {
    /// All event blocks in display order.
    pub const ALL: [Self; 3] = [Self::National, Self::OlympicCycle, Self::Championship];

    /// URL slug used in API paths.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::National => "national",
            Self::OlympicCycle => "olympic-cycle",
            Self::Championship => "championship",
        }
    }

    /// Human-readable block heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::National => "Block 2: National Events",
            Self::OlympicCycle => "Block 3: International Events - Olympic Cycle",
            Self::Championship => "Block 4: International Events - Championships",
        }
    }

    /// Events selectable in this block, first one being the default.
    #[must_use]
    pub const fn events(self) -> &'static [EventName] {
        match self {
            Self::National => &[EventName::NationalGames, EventName::NationalChampionship],
            Self::OlympicCycle => &[
                EventName::SouthAmericanGames,
                EventName::PanAmericanGames,
                EventName::OlympicGames,
            ],
            Self::Championship => &[
                EventName::SouthAmericanChampionship,
                EventName::CentralAmericanChampionship,
                EventName::PanAmericanChampionship,
                EventName::WorldChampionship,
            ],
        }
    }

    /// The event preselected when a session opens.
    #[must_use]
    pub const fn default_event(self) -> EventName {
        match self {
            Self::National => EventName::NationalGames,
            Self::OlympicCycle => EventName::SouthAmericanGames,
            Self::Championship => EventName::SouthAmericanChampionship,
        }
    }
}

impl fmt::Display for EventBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EventBlock {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|block| block.slug() == s)
            .ok_or_else(|| SurveyError::UnknownBlock(s.to_string()))
    }
}

/// Sports event a result was obtained at.
///
/// Serialized with its display label, which is also the value written to
/// the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EventName {
    /// National multi-sport games.
    #[serde(rename = "National Games")]
    NationalGames,
    /// National single-sport championship.
    #[serde(rename = "National Championship")]
    NationalChampionship,
    /// South American Games.
    #[serde(rename = "South American Games")]
    SouthAmericanGames,
    /// Pan American Games.
    #[serde(rename = "Pan American Games")]
    PanAmericanGames,
    /// Olympic Games.
    #[serde(rename = "Olympic Games")]
    OlympicGames,
    /// South American Championship.
    #[serde(rename = "South American Championship")]
    SouthAmericanChampionship,
    /// Central American Championship.
    #[serde(rename = "Central American Championship")]
    CentralAmericanChampionship,
    /// Pan American Championship.
    #[serde(rename = "Pan American Championship")]
    PanAmericanChampionship,
    /// World Championship.
    #[serde(rename = "World Championship")]
    WorldChampionship,
}

impl EventName {
    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NationalGames => "National Games",
            Self::NationalChampionship => "National Championship",
            Self::SouthAmericanGames => "South American Games",
            Self::PanAmericanGames => "Pan American Games",
            Self::OlympicGames => "Olympic Games",
            Self::SouthAmericanChampionship => "South American Championship",
            Self::CentralAmericanChampionship => "Central American Championship",
            Self::PanAmericanChampionship => "Pan American Championship",
            Self::WorldChampionship => "World Championship",
        }
    }

    /// The block whose select widget offers this event.
    #[must_use]
    pub const fn block(self) -> EventBlock {
        match self {
            Self::NationalGames | Self::NationalChampionship => EventBlock::National,
            Self::SouthAmericanGames | Self::PanAmericanGames | Self::OlympicGames => {
                EventBlock::OlympicCycle
            }
            Self::SouthAmericanChampionship
            | Self::CentralAmericanChampionship
            | Self::PanAmericanChampionship
            | Self::WorldChampionship => EventBlock::Championship,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Function the coach performed at the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Head coach.
    #[default]
    Principal,
    /// Assistant coach.
    Assistant,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Self; 2] = [Self::Principal, Self::Assistant];

    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Principal => "Principal",
            Self::Assistant => "Assistant",
        }
    }
}

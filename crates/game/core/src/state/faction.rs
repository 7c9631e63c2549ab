/// Actor faction (relationship/allegiance).
///
/// Faction decides the "hostile to" relation: only monsters hostile to the
/// player can hold time in tactical mode.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// No specific faction (default)
    #[default]
    None,
    /// Player's faction
    Player,
    /// Friendly to player
    Friendly,
    /// Neutral (won't attack unless provoked)
    Neutral,
    /// Hostile to player
    Hostile,
    /// Goblin tribes
    GoblinClan,
    /// Orc warbands
    OrcHorde,
    /// Undead forces
    UndeadLegion,
    /// Wildlife (animals, beasts)
    Wildlife,
}

impl Faction {
    /// Check if this faction is hostile to another faction.
    pub fn is_hostile_to(&self, other: &Faction) -> bool {
        match (self, other) {
            (Faction::Player, Faction::Hostile)
            | (Faction::Hostile, Faction::Player)
            | (Faction::Player, Faction::GoblinClan)
            | (Faction::GoblinClan, Faction::Player)
            | (Faction::Player, Faction::OrcHorde)
            | (Faction::OrcHorde, Faction::Player)
            | (Faction::Player, Faction::UndeadLegion)
            | (Faction::UndeadLegion, Faction::Player) => true,

            (Faction::Neutral, _) | (_, Faction::Neutral) => false,
            (Faction::None, _) | (_, Faction::None) => false,

            (Faction::GoblinClan, Faction::OrcHorde) | (Faction::OrcHorde, Faction::GoblinClan) => {
                true
            }

            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn hostility_is_checked_in_both_directions() {
        assert!(Faction::Player.is_hostile_to(&Faction::GoblinClan));
        assert!(Faction::GoblinClan.is_hostile_to(&Faction::Player));
        assert!(!Faction::Player.is_hostile_to(&Faction::Friendly));
        assert!(!Faction::Wildlife.is_hostile_to(&Faction::Player));
        assert!(!Faction::Hostile.is_hostile_to(&Faction::Hostile));
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!(Faction::from_str("goblin_clan"), Ok(Faction::GoblinClan));
        assert_eq!(Faction::from_str("HOSTILE"), Ok(Faction::Hostile));
        assert_eq!(Faction::UndeadLegion.to_string(), "undead_legion");
    }
}

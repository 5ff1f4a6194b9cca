//! Identifiers for the supported liquid-staking protocols.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A liquid-staking protocol that accepts native SOL deposits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolId {
    Marinade,
    Jito,
    Blaze,
    Marginfi,
    Jpool,
    Solayer,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown staking protocol: {0}")]
pub struct UnknownProtocol(pub String);

/// Aliases too generic to pick a protocol out of free text.
const GENERIC_ALIASES: &[&str] = &["lst"];

impl ProtocolId {
    pub const ALL: [ProtocolId; 6] = [
        ProtocolId::Marinade,
        ProtocolId::Jito,
        ProtocolId::Blaze,
        ProtocolId::Marginfi,
        ProtocolId::Jpool,
        ProtocolId::Solayer,
    ];

    /// Canonical lowercase name used in config, tool args and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolId::Marinade => "marinade",
            ProtocolId::Jito => "jito",
            ProtocolId::Blaze => "blaze",
            ProtocolId::Marginfi => "marginfi",
            ProtocolId::Jpool => "jpool",
            ProtocolId::Solayer => "solayer",
        }
    }

    /// Brand name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProtocolId::Marinade => "Marinade",
            ProtocolId::Jito => "Jito",
            ProtocolId::Blaze => "BlazeStake",
            ProtocolId::Marginfi => "MarginFi",
            ProtocolId::Jpool => "JPool",
            ProtocolId::Solayer => "Solayer",
        }
    }

    /// Symbol of the liquid staking token received for a deposit.
    pub fn lst_symbol(&self) -> &'static str {
        match self {
            ProtocolId::Marinade => "mSOL",
            ProtocolId::Jito => "JitoSOL",
            ProtocolId::Blaze => "bSOL",
            ProtocolId::Marginfi => "LST",
            ProtocolId::Jpool => "JSOL",
            ProtocolId::Solayer => "sSOL",
        }
    }

    /// Lowercase names and aliases accepted by [`FromStr`].
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ProtocolId::Marinade => &["marinade", "msol"],
            ProtocolId::Jito => &["jito", "jitosol"],
            ProtocolId::Blaze => &["blaze", "blazestake", "solblaze", "bsol"],
            ProtocolId::Marginfi => &["marginfi", "mrgn", "lst"],
            ProtocolId::Jpool => &["jpool", "jsol"],
            ProtocolId::Solayer => &["solayer", "ssol"],
        }
    }

    /// Finds the protocol named earliest in `text`, matching whole words.
    ///
    /// Generic words like "lst" only resolve through [`FromStr`].
    pub fn find_in_text(text: &str) -> Option<ProtocolId> {
        let lower = text.to_lowercase();
        lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty() && !GENERIC_ALIASES.contains(w))
            .find_map(|word| {
                ProtocolId::ALL
                    .into_iter()
                    .find(|id| id.aliases().contains(&word))
            })
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolId {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        let needle = needle.trim_end_matches(" finance").replace([' ', '-', '_'], "");
        ProtocolId::ALL
            .into_iter()
            .find(|id| id.aliases().contains(&needle.as_str()))
            .ok_or_else(|| UnknownProtocol(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("marinade", ProtocolId::Marinade)]
    #[case("Marinade Finance", ProtocolId::Marinade)]
    #[case("mSOL", ProtocolId::Marinade)]
    #[case("JitoSOL", ProtocolId::Jito)]
    #[case("Solblaze", ProtocolId::Blaze)]
    #[case("blaze-stake", ProtocolId::Blaze)]
    #[case("marginfi", ProtocolId::Marginfi)]
    #[case(" JPool ", ProtocolId::Jpool)]
    #[case("sSOL", ProtocolId::Solayer)]
    fn parses_names_and_aliases(#[case] input: &str, #[case] expected: ProtocolId) {
        assert_eq!(input.parse::<ProtocolId>().unwrap(), expected);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "lido".parse::<ProtocolId>().unwrap_err();
        assert_eq!(err, UnknownProtocol("lido".to_string()));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for id in ProtocolId::ALL {
            assert_eq!(id.to_string().parse::<ProtocolId>().unwrap(), id);
        }
    }

    #[test]
    fn finds_protocol_by_whole_word() {
        assert_eq!(
            ProtocolId::find_in_text("Stake 2 SOL with Jito please"),
            Some(ProtocolId::Jito)
        );
        assert_eq!(
            ProtocolId::find_in_text("I want bSOL for 1.5 sol"),
            Some(ProtocolId::Blaze)
        );
        assert_eq!(ProtocolId::find_in_text("stake 1 sol via mylstpool"), None);
    }

    #[rstest]
    #[case("stake 3 SOL with jito, not marinade", Some(ProtocolId::Jito))]
    #[case("msol or bsol? go with bSOL", Some(ProtocolId::Marinade))]
    #[case("stake 2 SOL into the best LST", None)]
    #[case("stake 2 SOL into marginfi's LST", Some(ProtocolId::Marginfi))]
    fn finds_earliest_named_protocol(#[case] text: &str, #[case] expected: Option<ProtocolId>) {
        assert_eq!(ProtocolId::find_in_text(text), expected);
    }

    #[test]
    fn lst_still_parses_as_marginfi() {
        assert_eq!("LST".parse::<ProtocolId>().unwrap(), ProtocolId::Marginfi);
    }
}

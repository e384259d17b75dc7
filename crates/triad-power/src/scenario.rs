use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use triad_core::TriadError;

/// Scaling law applied when turning subsystem maturity into power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerScenario {
    /// No output at any time.
    None,
    /// Linear in the first subsystem.
    Phase1,
    /// Linear in the first subsystem, boosted by the squared synergy.
    Both,
}

impl PowerScenario {
    pub const ALL: [PowerScenario; 3] = [Self::None, Self::Phase1, Self::Both];

    pub fn tag(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Phase1 => "phase1",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for PowerScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PowerScenario {
    type Err = TriadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "phase1" => Ok(Self::Phase1),
            "both" => Ok(Self::Both),
            other => Err(TriadError::InvalidScenario(other.to_string())),
        }
    }
}

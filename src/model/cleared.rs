use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClearedStatus {
    #[default]
    NotCleared,
    Cleared,
    Reconciled,
    Unknown,
}

impl ClearedStatus {
    /// The value written after the `C` code, if the status is written at all.
    pub fn qif_code(self) -> Option<&'static str> {
        match self {
            ClearedStatus::Cleared => Some("*"),
            ClearedStatus::Reconciled => Some("X"),
            ClearedStatus::NotCleared | ClearedStatus::Unknown => None,
        }
    }
}

impl Display for ClearedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClearedStatus::NotCleared => "not cleared",
            ClearedStatus::Cleared => "cleared",
            ClearedStatus::Reconciled => "reconciled",
            ClearedStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

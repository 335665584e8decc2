//! Gate kinds recognized in fault-tree logic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Boolean combinator of a fault-tree gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateType {
    /// All inputs must occur
    And,
    /// Any input occurs
    Or,
    /// Negation of the single input
    Not,
    /// Exactly one input occurs
    Xor,
    /// Negated AND
    Nand,
    /// Negated OR
    Nor,
    /// Transfer to logic defined elsewhere
    Tran,
}

impl GateType {
    /// Every recognized kind, in canonical order
    pub const ALL: [GateType; 7] = [
        GateType::And,
        GateType::Or,
        GateType::Not,
        GateType::Xor,
        GateType::Nand,
        GateType::Nor,
        GateType::Tran,
    ];

    /// Canonical upper-case token
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GateType::And => "AND",
            GateType::Or => "OR",
            GateType::Not => "NOT",
            GateType::Xor => "XOR",
            GateType::Nand => "NAND",
            GateType::Nor => "NOR",
            GateType::Tran => "TRAN",
        }
    }

    /// Whether `token` is exactly one of the canonical tokens
    #[must_use]
    pub fn is_recognized(token: &str) -> bool {
        token.parse::<GateType>().is_ok()
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for tokens that are not a canonical gate kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized gate type: '{0}'")]
pub struct UnknownGateType(pub String);

impl FromStr for GateType {
    type Err = UnknownGateType;

    /// Strict parse: only the seven canonical tokens are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownGateType(s.to_string()))
    }
}

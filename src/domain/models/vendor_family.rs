use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire shape a vendor API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorFamily {
    /// Ordered list of role-tagged messages per call (chat-completion APIs).
    Completion,
    /// One concatenated prompt string per call (generate-content APIs).
    Generation,
}

impl VendorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorFamily::Completion => "completion",
            VendorFamily::Generation => "generation",
        }
    }
}

impl fmt::Display for VendorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

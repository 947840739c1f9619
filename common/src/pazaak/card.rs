use serde::{Deserialize, Serialize};
use std::fmt;

/// A card as the server describes it: the numeric effect on the score and
/// its signed label (e.g. "+4", "-2").
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub modifier: i32,
    pub parity: String,
}

impl Card {
    pub fn new(modifier: i32) -> Self {
        Card {
            modifier,
            parity: format!("{:+}", modifier),
        }
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn parity(&self) -> &str {
        &self.parity
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parity)
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user's attendance intent for a showtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowtimeStatus {
    Going,
    Interested,
    NotGoing,
}

impl ShowtimeStatus {
    /// Wire value, also used as the `selectedStatuses` filter value.
    pub fn as_str(self) -> &'static str {
        match self {
            ShowtimeStatus::Going => "GOING",
            ShowtimeStatus::Interested => "INTERESTED",
            ShowtimeStatus::NotGoing => "NOT_GOING",
        }
    }
}

impl fmt::Display for ShowtimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShowtimeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "GOING" => Ok(ShowtimeStatus::Going),
            "INTERESTED" => Ok(ShowtimeStatus::Interested),
            "NOT_GOING" => Ok(ShowtimeStatus::NotGoing),
            _ => Err(format!(
                "Invalid status: {}. Use going, interested or not-going",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient_case() {
        assert_eq!("going".parse::<ShowtimeStatus>(), Ok(ShowtimeStatus::Going));
        assert_eq!(
            "not-going".parse::<ShowtimeStatus>(),
            Ok(ShowtimeStatus::NotGoing)
        );
        assert!("maybe".parse::<ShowtimeStatus>().is_err());
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&ShowtimeStatus::Interested).unwrap();
        assert_eq!(json, "\"INTERESTED\"");
    }
}

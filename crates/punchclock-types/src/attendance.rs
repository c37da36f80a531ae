//! Attendance direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clock-in or clock-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceType {
    Enter,
    Leave,
}

impl AttendanceType {
    /// Wire name used by the portal API.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceType::Enter => "ENTER",
            AttendanceType::Leave => "LEAVE",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceType::Enter => "clock-in",
            AttendanceType::Leave => "clock-out",
        }
    }
}

impl fmt::Display for AttendanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENTER" => Ok(AttendanceType::Enter),
            "LEAVE" => Ok(AttendanceType::Leave),
            other => Err(format!("unknown attendance type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceType::Enter).unwrap(),
            "\"ENTER\""
        );
        let parsed: AttendanceType = serde_json::from_str("\"LEAVE\"").unwrap();
        assert_eq!(parsed, AttendanceType::Leave);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("enter".parse::<AttendanceType>(), Ok(AttendanceType::Enter));
        assert_eq!(" Leave ".parse::<AttendanceType>(), Ok(AttendanceType::Leave));
        assert!("lunch".parse::<AttendanceType>().is_err());
    }
}

//! Enumerations stored as text columns

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::criteria::FilterValue;
use crate::data::criteria::SqlValue;

/// Patient sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MALE" => Some(Self::Male),
            "FEMALE" => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FilterValue for Sex {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.as_str().to_string())
    }

    fn parse_param(raw: &str) -> Result<Self, String> {
        Self::parse(raw.trim()).ok_or_else(|| format!("'{}' is not one of MALE, FEMALE", raw))
    }
}

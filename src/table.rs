use std::{fmt, ops::Not, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Id;

/// A physical board in the hall. Tables have their own lifecycle and are
/// only referenced by matches when assignment is turned on.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Table {
    pub id: Id,
    pub name: String,
    pub order: u32,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AssignTables {
    No,
    #[default]
    Yes,
}

impl fmt::Display for AssignTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignTables::No => write!(f, "open seating"),
            AssignTables::Yes => write!(f, "assigned tables"),
        }
    }
}

impl Not for AssignTables {
    type Output = AssignTables;

    fn not(self) -> Self::Output {
        match self {
            AssignTables::No => AssignTables::Yes,
            AssignTables::Yes => AssignTables::No,
        }
    }
}

impl From<bool> for AssignTables {
    fn from(boolean: bool) -> Self {
        if boolean { Self::Yes } else { Self::No }
    }
}

impl From<AssignTables> for bool {
    fn from(assign: AssignTables) -> Self {
        match assign {
            AssignTables::Yes => true,
            AssignTables::No => false,
        }
    }
}

impl FromStr for AssignTables {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        match string {
            "assigned" | "assigned tables" => Ok(Self::Yes),
            "open" | "open seating" => Ok(Self::No),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to AssignTables!"
            ))),
        }
    }
}

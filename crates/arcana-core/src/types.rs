//! Identifiers and base stat blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Catalog id of a unit template (`"ignis-ronin"`).
    UnitId
);
string_id!(
    /// Unique tag of one summoned copy (`"ignis-ronin-k3x9a0qz"`, `"pity-..."`).
    RollId
);
string_id!(
    /// Catalog id of an ultimate.
    UltimateId
);
string_id!(BannerId);
string_id!(NodeId);

/// Base combat stats of a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
}

impl Stats {
    /// Enemy scaling: hp, atk and def grow with `power`, speed does not.
    pub fn scaled(&self, power: f64) -> Self {
        Self {
            hp: self.hp * power,
            atk: self.atk * power,
            def: self.def * power,
            spd: self.spd,
        }
    }
}

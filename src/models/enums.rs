//! Shared domain enums, stored as lowercase TEXT columns

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Implements string conversions and the sqlx TEXT mapping for a unit enum.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {} value: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Custody status of an equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    InStock,
    Issued,
    InRepair,
    WrittenOff,
}

text_enum!(EquipmentStatus {
    InStock => "in_stock",
    Issued => "issued",
    InRepair => "in_repair",
    WrittenOff => "written_off",
});

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Issue,
    Return,
    Move,
    Repair,
    WriteOff,
}

text_enum!(ActionType {
    Issue => "issue",
    Return => "return",
    Move => "move",
    Repair => "repair",
    WriteOff => "write_off",
});

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Condition reported when equipment comes back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Ok,
    NeedRepair,
    Damaged,
}

text_enum!(Condition {
    Ok => "ok",
    NeedRepair => "need_repair",
    Damaged => "damaged",
});

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Overdue,
    Repair,
    Info,
}

text_enum!(NotificationKind {
    Overdue => "overdue",
    Repair => "repair",
    Info => "info",
});

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User role; permissions are derived from it through `Role::allows`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Storekeeper,
    Worker,
    Observer,
}

text_enum!(Role {
    Admin => "admin",
    Storekeeper => "storekeeper",
    Worker => "worker",
    Observer => "observer",
});

impl Default for Role {
    fn default() -> Self {
        Role::Worker
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Inventory session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Open,
    Closed,
}

text_enum!(SessionState {
    Open => "open",
    Closed => "closed",
});

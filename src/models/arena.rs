//! Arena model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Competition tier, ordered from entry level to the top
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "arena_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArenaTier {
    Recruit,
    Veteran,
    Champion,
    Elite,
}

impl ArenaTier {
    /// All tiers in ascending order
    pub const ALL: [ArenaTier; 4] = [Self::Recruit, Self::Veteran, Self::Champion, Self::Elite];

    /// The tier directly above this one
    pub fn next(self) -> Option<ArenaTier> {
        match self {
            Self::Recruit => Some(Self::Veteran),
            Self::Veteran => Some(Self::Champion),
            Self::Champion => Some(Self::Elite),
            Self::Elite => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruit => "recruit",
            Self::Veteran => "veteran",
            Self::Champion => "champion",
            Self::Elite => "elite",
        }
    }
}

impl fmt::Display for ArenaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArenaTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recruit" => Ok(Self::Recruit),
            "veteran" => Ok(Self::Veteran),
            "champion" => Ok(Self::Champion),
            "elite" => Ok(Self::Elite),
            other => Err(format!("Unknown arena tier: {}", other)),
        }
    }
}

/// Arena database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Arena {
    pub id: Uuid,
    pub name: String,
    pub tier: ArenaTier,
    pub description: Option<String>,
    /// Entry fee in tokens
    pub token_cost: i64,
    pub max_participants: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Arena {
    /// Check whether another contestant fits given the current active count
    pub fn has_capacity(&self, active_contestants: i64) -> bool {
        active_contestants < i64::from(self.max_participants)
    }
}

/// Seed data for an arena
#[derive(Debug, Clone)]
pub struct ArenaSeed {
    pub name: &'static str,
    pub tier: ArenaTier,
    pub token_cost: i64,
    pub description: &'static str,
}

/// The four arenas every deployment starts with
pub const DEFAULT_ARENAS: [ArenaSeed; 4] = [
    ArenaSeed {
        name: "Recruit Arena",
        tier: ArenaTier::Recruit,
        token_cost: 15,
        description: "Start your journey in the Recruit tier. Perfect for newcomers to showcase their talent and begin their rise to royalty.",
    },
    ArenaSeed {
        name: "Veteran Arena",
        tier: ArenaTier::Veteran,
        token_cost: 25,
        description: "Prove your skills in the Veteran tier. For those who have mastered the basics and are ready for greater challenges.",
    },
    ArenaSeed {
        name: "Champion Arena",
        tier: ArenaTier::Champion,
        token_cost: 55,
        description: "Compete with the best in the Champion tier. Reserved for performers who dominate their craft.",
    },
    ArenaSeed {
        name: "Elite Arena",
        tier: ArenaTier::Elite,
        token_cost: 100,
        description: "Reach the pinnacle in the Elite tier, with exclusive access to the Finale Royale.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(ArenaTier::Recruit < ArenaTier::Veteran);
        assert!(ArenaTier::Veteran < ArenaTier::Champion);
        assert!(ArenaTier::Champion < ArenaTier::Elite);
        assert_eq!(ArenaTier::ALL.iter().max(), Some(&ArenaTier::Elite));
    }

    #[test]
    fn test_tier_next_and_parse() {
        assert_eq!(ArenaTier::Recruit.next(), Some(ArenaTier::Veteran));
        assert_eq!(ArenaTier::Elite.next(), None);
        assert_eq!("champion".parse::<ArenaTier>(), Ok(ArenaTier::Champion));
        assert!("royal".parse::<ArenaTier>().is_err());
        assert_eq!(ArenaTier::Veteran.to_string(), "veteran");
    }

    #[test]
    fn test_default_arena_costs() {
        let costs: Vec<i64> = DEFAULT_ARENAS.iter().map(|a| a.token_cost).collect();
        assert_eq!(costs, vec![15, 25, 55, 100]);
    }
}

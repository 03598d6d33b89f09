//! Arena request DTOs

use serde::Deserialize;

pub use crate::services::EntrySubmission as JoinArenaRequest;

/// Arena listing query
#[derive(Debug, Default, Deserialize)]
pub struct ListArenasQuery {
    /// Include closed arenas
    #[serde(default)]
    pub include_inactive: bool,
}

//! Domain payloads for the campaign companion demo.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rocket in the campaign's hangar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    /// Unique identifier.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Remaining fuel units.
    pub fuel: u32,
}

/// A book in the campaign's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier.
    pub id: Uuid,

    /// Title.
    pub title: String,

    /// Author name.
    pub author: String,
}

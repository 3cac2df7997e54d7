pub mod entity;
pub mod genre;

pub use entity::{ContentEntry, ContentKind};
pub use genre::{GenreFilter, ACTION_AND_ADVENTURE};

pub mod entity;

pub use entity::MovieDetail;

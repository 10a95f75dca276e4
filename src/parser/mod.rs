pub mod genre;
pub mod video;

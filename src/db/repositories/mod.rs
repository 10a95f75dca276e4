pub mod attachment;
pub mod banner;
pub mod episode;
pub mod genre;
pub mod library;
pub mod movie;
pub mod season;
pub mod token;
pub mod user;

pub mod prelude;

pub mod access_tokens;
pub mod attachments;
pub mod banner;
pub mod episode;
pub mod genres;
pub mod movies;
pub mod season;
pub mod user_movie_likes;
pub mod user_web;
pub mod user_web_list;

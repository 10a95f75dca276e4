pub use super::access_tokens::Entity as AccessTokens;
pub use super::attachments::Entity as Attachments;
pub use super::banner::Entity as Banner;
pub use super::episode::Entity as Episode;
pub use super::genres::Entity as Genres;
pub use super::movies::Entity as Movies;
pub use super::season::Entity as Season;
pub use super::user_movie_likes::Entity as UserMovieLikes;
pub use super::user_web::Entity as UserWeb;
pub use super::user_web_list::Entity as UserWebList;

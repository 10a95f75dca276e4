pub mod image;
pub use image::ImageService;

pub mod search;
pub mod validation;
pub use validation::FieldErrors;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthToken, ProfileInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{
    BannerInfo, CatalogError, CatalogService, GenreInfo, MovieDetail, SeriesDetail, Suggestions,
    TrendingCard,
};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod library_service;
pub mod library_service_impl;
pub use library_service::{LibraryError, LibraryService};
pub use library_service_impl::SeaOrmLibraryService;

pub mod admin_service;
pub mod admin_service_impl;
pub use admin_service::{AdminError, AdminService};
pub use admin_service_impl::SeaOrmAdminService;

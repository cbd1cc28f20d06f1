pub mod search;
pub use search::SearchService;

pub mod image;
pub use image::{ImageProvider, ImageService};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, TokenResponse, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod dashboard_service;
pub mod dashboard_service_impl;
pub use dashboard_service::{
    DashboardError, DashboardService, EntryDetail, ListQuery, SavePayload,
};
pub use dashboard_service_impl::SeaOrmDashboardService;

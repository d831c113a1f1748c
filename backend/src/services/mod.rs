//! Business logic services for Volt Dealer Suite

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod permission;
pub mod product;
pub mod reporting;
pub mod sales;
pub mod stock;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use dashboard::DashboardService;
pub use permission::PermissionService;
pub use product::ProductService;
pub use reporting::ReportingService;
pub use sales::SalesService;
pub use stock::StockService;

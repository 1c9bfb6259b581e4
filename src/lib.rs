pub mod config;
pub mod controller;
pub mod navigation;
pub mod recent;
pub mod service;
pub mod session;
pub mod suggest;

pub use controller::SearchInputController;
pub use recent::RecentSearches;
pub use service::StorefrontSearchService;

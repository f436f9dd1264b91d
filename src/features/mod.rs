pub mod auth;
pub mod banners;
pub mod health;

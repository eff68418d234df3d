pub mod app;
pub mod config;
pub mod credits;
pub mod jobs;
pub mod page;
pub mod tmdb;
pub mod views;

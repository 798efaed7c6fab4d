pub mod app;
pub mod handlers;
pub mod presentation;
pub mod state;

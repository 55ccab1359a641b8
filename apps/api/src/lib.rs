pub mod config;
pub mod errors;
pub mod ml;
pub mod ml_client;
pub mod models;
pub mod presentation;
pub mod review;
pub mod routes;
pub mod settings;
pub mod state;

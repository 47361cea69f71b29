pub mod config;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

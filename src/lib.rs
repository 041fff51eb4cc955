pub mod common;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

//! CareLink server: hospital, provider and patient records with criteria queries

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

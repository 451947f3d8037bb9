// Library root for the estate user-admin service

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infra;

// Core domain: models and errors

pub mod errors;
pub mod models;

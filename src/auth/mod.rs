// Authentication & authorization module

pub mod audit_logger;
pub mod bearer;
pub mod guard;

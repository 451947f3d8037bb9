// User administration: request parsing, operations and the list join

pub mod command;
pub mod directory;
pub mod operations;

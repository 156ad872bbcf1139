pub mod commands;
pub mod template;

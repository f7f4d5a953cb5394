pub mod file;
pub mod record;
pub mod stdin;

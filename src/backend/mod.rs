pub mod analysis;
pub mod loader;
pub mod parser;
pub mod record;

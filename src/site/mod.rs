mod flag;
mod generator;

pub use generator::write_site;

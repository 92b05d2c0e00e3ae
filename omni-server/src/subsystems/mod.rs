pub mod generate;
pub mod records;
pub mod sessions;
pub mod stats;

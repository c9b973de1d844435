pub mod library;
pub mod recommend;
pub mod stats;

pub use library::Library;

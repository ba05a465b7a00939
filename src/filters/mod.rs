//! Filter implementations

pub mod category;
pub mod level;
pub mod time;

pub use category::CategoryFilter;
pub use level::LevelFilter;
pub use time::TimeFilter;

pub mod analyze;
pub mod completions;
pub mod estimate;
pub mod focus;
pub mod stats;

pub mod parallel;
pub mod progress;

pub mod engine;
pub mod medal;
pub mod penalty;
pub mod policy;
pub mod validity;
pub mod week;

pub use engine::{evaluate_week, GamificationError, WeeklyDecision};

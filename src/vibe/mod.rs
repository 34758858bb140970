pub mod classify;
pub mod score;

pub use classify::{classify, VibeLabel};
pub use score::{best_window, select, select_best, Archetype, BestWindow};

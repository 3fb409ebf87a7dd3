pub mod frequency;
pub mod streak;

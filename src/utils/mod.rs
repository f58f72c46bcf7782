pub mod random;
pub mod similarity;
pub mod time;

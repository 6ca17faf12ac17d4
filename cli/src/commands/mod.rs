pub mod filter;
pub mod score;

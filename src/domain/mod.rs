pub mod feature_flag;
pub mod filter;
pub mod supplier;
pub mod types;

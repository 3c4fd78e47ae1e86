pub mod config;
pub mod encode;
pub mod fst;
pub mod logger;
pub mod utils;
pub mod validation;
pub mod weight;

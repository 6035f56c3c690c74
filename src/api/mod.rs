pub mod mlb_api;
pub mod odds_api;

pub use mlb_api::*;
pub use odds_api::*;

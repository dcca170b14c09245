pub mod server;
pub mod state;

pub use server::{routes, spawn_churn};
pub use state::LotState;

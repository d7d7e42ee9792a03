//! Sheet state and logic (UI-agnostic).

mod eval;
mod ops;
mod print;
mod state;

pub use state::Sheet;

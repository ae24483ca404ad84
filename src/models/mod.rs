// Re-export model modules
mod donation;
mod exchange_rates;

pub use donation::*;
pub use exchange_rates::*;

// Re-export modules
pub mod config;
pub mod dedup;
pub mod emit;
pub mod error;
pub mod filter;
pub mod harvest;
pub mod interpreter;
pub mod liveness;
pub mod paginate;
pub mod parsers;
pub mod pipeline;
pub mod profiles;
pub mod providers;
pub mod query;
pub mod results;
pub mod throttle;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use error::{HarvestError, Result};
pub use harvest::{Backend, Harvest};
pub use pipeline::Pipeline;
pub use profiles::Profile;
pub use results::{Candidate, RunReport};

pub mod error;
pub mod executor;
pub mod mapping;

pub use error::SubmitError;
pub use executor::submit;

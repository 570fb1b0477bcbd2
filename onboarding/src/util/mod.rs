pub mod errors;
pub mod money;

pub use errors::{ClientError, ProviderError, Result};
pub use money::MinorUnits;

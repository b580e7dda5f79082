//! Model layer
//!
//! The standardization scaler, the isolation-forest detector and the
//! store that persists both between training and serving.

mod isolation_forest;
mod scaler;
mod store;

pub use isolation_forest::*;
pub use scaler::*;
pub use store::*;

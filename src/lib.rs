pub mod error;
pub mod geometry;
pub mod io;
pub mod math;
pub mod model;
pub mod validate;

pub use error::{BrepvalError, Result};

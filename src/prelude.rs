pub use crate::errors::{Error, Result};

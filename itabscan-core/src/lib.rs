pub mod binary;
mod error;
pub mod formats;
pub mod interface;
pub mod itab;
pub mod sections;

pub use binary::*;
pub use error::{Error, Result};
pub use formats::*;
pub use interface::*;
pub use sections::*;

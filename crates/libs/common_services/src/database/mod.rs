mod error;
mod pool;
mod stores;

pub use error::*;
pub use pool::*;
pub use stores::*;

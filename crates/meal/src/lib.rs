mod service;
mod suggest;

pub use service::*;
pub use suggest::*;

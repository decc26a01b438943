mod generative;
mod generator;
mod mock;
mod parse;
mod service;

pub use generative::TextClient;
pub use generator::*;
pub use service::*;

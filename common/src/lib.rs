pub mod messages;
mod pazaak;

pub use pazaak::*;

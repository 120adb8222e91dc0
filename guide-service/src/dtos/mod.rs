pub mod generate;

pub use generate::{GenerateRequest, LocationQuery, MalformedRequest};

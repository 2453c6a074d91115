pub use client::*;
pub use envelope::*;
pub use resource::*;
pub use upload::*;

mod admin;
mod client;
mod envelope;
mod resource;
mod upload;

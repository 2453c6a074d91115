pub use blog::*;
pub use encoding::*;
pub use event::*;
pub use house::*;
pub use land::*;
pub use listing::*;
pub use taxonomy::*;
pub use validate::*;

mod blog;
mod encoding;
mod event;
mod house;
mod land;
mod listing;
mod taxonomy;
mod validate;

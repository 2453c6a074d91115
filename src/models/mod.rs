pub use blog::*;
pub use blog_status::*;
pub use campaign::*;
pub use event::*;
pub use house::*;
pub use image::*;
pub use land::*;
pub use listing_status::*;
pub use location::*;
pub use media::*;
pub use review::*;
pub use review_stats::*;
pub use review_status::*;
pub use subscriber::*;
pub use taxonomy::*;
pub use unit::*;

mod blog;
mod blog_status;
mod campaign;
mod event;
mod house;
mod image;
mod land;
mod listing_status;
mod location;
mod media;
mod review;
mod review_stats;
mod review_status;
mod subscriber;
mod taxonomy;
mod unit;

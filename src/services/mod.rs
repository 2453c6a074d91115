pub mod comments;
pub mod dashboard;
pub mod image_staging;
pub mod listing;
pub mod mailer;
pub mod moderation;
pub mod newsletter;

pub use comments::{CommentsClient, CommentsQuery};
pub use dashboard::DashboardStats;
pub use image_staging::*;
pub use listing::{FetchTicket, ListingState, ListingView, PageControls};
pub use mailer::{Mailer, OutgoingEmail};
pub use moderation::{ReviewBoard, ReviewCounts};
pub use newsletter::CampaignDraft;

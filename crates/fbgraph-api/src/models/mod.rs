// Typed Graph objects
//
// Every model keeps response fields it does not map in `extra`, so a
// decode/encode round trip is lossless.

pub mod ad_account;
pub mod comment;
pub mod common;
pub mod insight;
pub mod page;
pub mod photo;
pub mod post;
pub mod user;

pub use ad_account::{AccountStatus, AdAccount, DisableReason};
pub use comment::Comment;
pub use common::{Birthday, Embedded, Location, Picture, Place, Reference, Tag};
pub use insight::{Insight, InsightValue, Metric, MetricValue, Period};
pub use page::Page;
pub use photo::{ImageSource, Photo};
pub use post::{
    EventAttachment, LinkAttachment, MediaAttachment, PhotoAttachment, Post, PostContent, PostType,
};
pub use user::{Gender, User};

pub mod media;
pub mod user;

pub use media::{MediaDetail, MediaRecord, MediaSummary, UploadedMedia};
pub use user::{RegisteredUser, UserCredentials};

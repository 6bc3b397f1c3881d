//! HTTP request handlers.

pub mod auth;
pub mod video_delete;
pub mod video_list;
pub mod video_share;
pub mod video_upload;

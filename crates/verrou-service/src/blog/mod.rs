//! The mini-blog.

pub mod post;

pub use post::{CreatePostInput, PostFilter, PostService, UpdatePostInput};

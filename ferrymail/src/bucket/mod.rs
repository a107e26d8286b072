//! Bucket list module for shared goals.
//!
//! Items belong to the list, not to a user: either user can complete or
//! reopen any item, while deletion stays with the creator.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{BucketError, BucketResult};
pub use manager::BucketManager;
pub use models::{
    AddBucketItemRequest, BucketItem, BucketItemId, MAX_NOTES_LENGTH, MAX_TITLE_LENGTH,
};

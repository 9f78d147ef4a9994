// file: src/storage/mod.rs
// description: blob storage module exports
// reference: internal module structure

pub mod blob;
pub mod uploader;

pub use blob::{BlobServiceClient, BlobStore, STORAGE_API_VERSION};
pub use uploader::BlobUploader;

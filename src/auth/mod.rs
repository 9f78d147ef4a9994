// file: src/auth/mod.rs
// description: credential module exports
// reference: internal module structure

pub mod credential;

pub use credential::{
    AccessToken, AzureDeveloperCliCredential, SEARCH_SCOPE, STORAGE_SCOPE, StaticTokenCredential,
    TokenCredential,
};

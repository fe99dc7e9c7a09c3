//! CookShare backend - recipe validation and leaderboard service
//!
//! Accepts recipe uploads, scores them against a hidden ingredient list,
//! stores them as blobs, and keeps a concurrent in-memory leaderboard with
//! a password-gated admin path that reveals the event flag.
//!
//! ## Architecture
//!
//! | Component | Module | Role |
//! |-----------|--------|------|
//! | Recipe scorer | [`scoring`] | case-insensitive ingredient scan + combo bonus |
//! | Leaderboard | [`leaderboard`] | sharded concurrent map, Set/Increment updates |
//! | Upload orchestrator | [`recipes`] | validate, score, persist, credit |
//! | Admin gateway | [`admin`] | password-gated Set + flag reveal |
//! | Blob storage | [`blob_store`] | trait seam + filesystem container backend |
//! | HTTP surface | [`http`] | hyper routes, multipart + JSON parsing |
//!
//! Scores live only in memory and reset on restart; blob storage is the
//! only durable side effect. Upload credits reach the leaderboard through a
//! direct in-process call, so the HTTP surface exposes no incrementing
//! path: the admin endpoint can only set scores, and only with the
//! configured password.

pub mod admin;
pub mod blob_store;
pub mod config;
pub mod error;
pub mod http;
pub mod leaderboard;
pub mod recipes;
pub mod response;
pub mod scoring;

pub use admin::AdminGateway;
pub use blob_store::{BlobStorage, FsBlobStore};
pub use config::Config;
pub use error::ApiError;
pub use http::HttpServer;
pub use leaderboard::{Leaderboard, UpdateMode};
pub use recipes::RecipeService;

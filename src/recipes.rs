//! Recipe upload orchestration
//!
//! Validates an upload, scores it, persists the blob, then credits the
//! leaderboard. Persistence comes first: a recipe that cannot be stored
//! never scores.

use crate::blob_store::{BlobMetadata, BlobStorage, StoredBlob};
use crate::error::ApiError;
use crate::leaderboard::{Leaderboard, UpdateMode};
use crate::scoring;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Upload size cap (10 MiB), enforced before any storage write.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Username that triggers the legendary-recipe easter egg.
const TOP_CHEF_USERNAME: &str = "top-chef";

/// Blob name of the easter-egg recipe.
const TOP_CHEF_BLOB_NAME: &str = "top-chef_legendary_recipe.txt";

/// Written alongside any upload from the top chef.
const TOP_CHEF_RECIPE: &str = "\
Legendary Recipe of the Top Chef
================================

Ingredients:
- 1 pinch of saffron, bloomed in warm broth
- 200g wagyu, cubed
- 1 white truffle, shaved tableside
- 30g caviar
- a whisper of yuzu zest

Method:
1. Sear the wagyu for 40 seconds a side.
2. Fold the saffron broth into a silky veloute.
3. Plate, shave the truffle, crown with caviar.
4. Finish with yuzu and serve immediately.

Signed, the Top Chef
";

/// A file received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Bytes,
}

/// Payload returned for a successful upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub score: i64,
    pub storage_url: String,
    pub file_name: String,
}

/// Orchestrates validation, scoring, persistence and leaderboard credit.
pub struct RecipeService {
    storage: Arc<dyn BlobStorage>,
    leaderboard: Arc<Leaderboard>,
}

impl RecipeService {
    pub fn new(storage: Arc<dyn BlobStorage>, leaderboard: Arc<Leaderboard>) -> Self {
        Self {
            storage,
            leaderboard,
        }
    }

    /// Validate an upload, score it, store it, and credit the score.
    ///
    /// Ordering is load-bearing: the blob write happens before the
    /// leaderboard update, so a storage failure leaves the board untouched.
    pub async fn validate_and_store(
        &self,
        username: &str,
        file: Option<UploadedFile>,
    ) -> Result<UploadOutcome, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::Validation("Username is required".to_string()));
        }

        let file = match file {
            Some(file) if !file.content.is_empty() => file,
            _ => return Err(ApiError::Validation("Recipe file is required".to_string())),
        };

        if file.content.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::Validation(
                "File size exceeds 10MB limit".to_string(),
            ));
        }

        let content = String::from_utf8_lossy(&file.content);
        let score = scoring::score_recipe(&content);

        let stored = self.store_recipe(username, &file).await?;

        if score > 0 {
            let outcome = self
                .leaderboard
                .update(username, score, UpdateMode::Increment);
            info!(
                username = %username,
                score = score,
                total = outcome.score,
                "Leaderboard credited"
            );
        }

        info!(
            username = %username,
            file = %file.name,
            score = score,
            locator = %stored.locator,
            "Recipe upload complete"
        );

        Ok(UploadOutcome {
            score,
            storage_url: stored.locator,
            file_name: file.name,
        })
    }

    /// Persist the upload (and the easter egg for the top chef).
    async fn store_recipe(
        &self,
        username: &str,
        file: &UploadedFile,
    ) -> Result<StoredBlob, ApiError> {
        let now = Utc::now();
        let blob_name = format!(
            "{}_{}_{}",
            sanitize_component(username),
            now.format("%Y%m%d_%H%M%S"),
            sanitize_component(&file.name),
        );
        let metadata = BlobMetadata {
            username: username.to_string(),
            upload_time: now.to_rfc3339(),
            original_file_name: file.name.clone(),
            file_size: file.content.len() as u64,
        };

        let stored = self.storage.put(&blob_name, &file.content, &metadata).await?;

        if username.eq_ignore_ascii_case(TOP_CHEF_USERNAME) {
            info!(username = %username, "Top chef detected, writing the legendary recipe");
            let egg_metadata = BlobMetadata {
                username: TOP_CHEF_USERNAME.to_string(),
                upload_time: now.to_rfc3339(),
                original_file_name: TOP_CHEF_BLOB_NAME.to_string(),
                file_size: TOP_CHEF_RECIPE.len() as u64,
            };
            self.storage
                .put(TOP_CHEF_BLOB_NAME, TOP_CHEF_RECIPE.as_bytes(), &egg_metadata)
                .await?;
        }

        Ok(stored)
    }
}

/// Path separators in user-supplied name parts would escape the container.
fn sanitize_component(part: &str) -> String {
    part.replace(['/', '\\'], "_")
}

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use vigil_core::models::{ImageRecord, Ticket};
use vigil_db::ImageStore;
use vigil_vision::ImageAnalyzer;
use vigil_worker::TicketHandler;

/// Captions stored images and records them.
///
/// Caption failures and empty caption lists are logged and settle the ticket
/// without a write. Insert failures are returned so the queue retries.
#[derive(Clone)]
pub struct DescriptionHandler {
    analyzer: Arc<dyn ImageAnalyzer>,
    images: Arc<dyn ImageStore>,
}

impl DescriptionHandler {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>, images: Arc<dyn ImageStore>) -> Self {
        Self { analyzer, images }
    }
}

#[async_trait]
impl TicketHandler for DescriptionHandler {
    #[tracing::instrument(skip(self, ticket), fields(image_url = %ticket.image_url, user_id = ?ticket.user_id))]
    async fn handle(&self, ticket: Ticket) -> Result<()> {
        let description = match self.analyzer.describe_url(&ticket.image_url).await {
            Ok(description) => description,
            Err(e) => {
                tracing::error!(error = %e, "Failed to describe image");
                return Ok(());
            }
        };

        let Some(caption) = description.first_caption() else {
            tracing::warn!("No description available");
            return Ok(());
        };

        let record = ImageRecord::new(
            ticket.image_url.as_str(),
            caption.text.as_str(),
            ticket.user_id.clone(),
        );
        let image_id = self
            .images
            .insert(&record)
            .await
            .context("Failed to store image description")?;

        tracing::info!(
            image_id,
            confidence = caption.confidence,
            "Image description stored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockAnalyzer, MockImageStore};

    fn handler(analyzer: MockAnalyzer) -> (DescriptionHandler, Arc<MockImageStore>) {
        let images = Arc::new(MockImageStore::default());
        (
            DescriptionHandler::new(Arc::new(analyzer), images.clone()),
            images,
        )
    }

    fn anonymous_ticket() -> Ticket {
        Ticket::from_json(serde_json::json!({
            "ImageUrl": "https://x/img1",
            "UserId": null
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_caption_is_stored() {
        let (handler, images) = handler(MockAnalyzer::describing(&["a dog on grass"]));

        handler.handle(anonymous_ticket()).await.unwrap();

        assert_eq!(
            images.rows(),
            vec![ImageRecord::new("https://x/img1", "a dog on grass", None)]
        );
    }

    #[tokio::test]
    async fn test_only_first_caption_is_used() {
        let (handler, images) = handler(MockAnalyzer::describing(&["a cat", "a small cat"]));

        handler
            .handle(Ticket::new(Some("alice".to_string()), "https://x/img2"))
            .await
            .unwrap();

        let rows = images.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "a cat");
        assert_eq!(rows[0].user_id.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_describe_failure_writes_nothing() {
        let (handler, images) = handler(MockAnalyzer::failing());

        handler.handle(anonymous_ticket()).await.unwrap();

        assert!(images.rows().is_empty());
    }

    #[tokio::test]
    async fn test_empty_captions_write_nothing() {
        let (handler, images) = handler(MockAnalyzer::describing(&[]));

        handler.handle(anonymous_ticket()).await.unwrap();

        assert!(images.rows().is_empty());
    }

    #[tokio::test]
    async fn test_redelivery_duplicates_row() {
        let (handler, images) = handler(MockAnalyzer::describing(&["a dog on grass"]));

        handler.handle(anonymous_ticket()).await.unwrap();
        handler.handle(anonymous_ticket()).await.unwrap();

        let rows = images.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], rows[1]);
    }

    #[tokio::test]
    async fn test_insert_failure_propagates() {
        let (handler, images) = handler(MockAnalyzer::describing(&["a dog on grass"]));
        images.fail();

        assert!(handler.handle(anonymous_ticket()).await.is_err());
    }
}

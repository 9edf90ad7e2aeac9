//! Upload screening
//!
//! A request either rejects (locking out a flagged user) or stores the blob
//! and forwards a ticket. The two outcomes never share side effects.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use uuid::Uuid;
use vigil_core::models::{ImageAnalysis, Ticket};
use vigil_core::{is_inappropriate, AnalysisFailurePolicy, AppError};
use vigil_db::{TicketPublisher, UserStore};
use vigil_storage::{generate_image_key, Storage};
use vigil_vision::ImageAnalyzer;

use crate::constants::UPLOAD_CONTENT_TYPE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Blob stored and ticket published.
    Accepted { ticket_id: Uuid, ticket: Ticket },
    /// Nothing stored. `locked_out` is set when the uploader's account was disabled.
    Rejected { locked_out: bool },
}

#[derive(Clone)]
pub struct IngressService {
    analyzer: Arc<dyn ImageAnalyzer>,
    users: Arc<dyn UserStore>,
    storage: Arc<dyn Storage>,
    publisher: Arc<dyn TicketPublisher>,
    failure_policy: AnalysisFailurePolicy,
}

impl IngressService {
    pub fn new(
        analyzer: Arc<dyn ImageAnalyzer>,
        users: Arc<dyn UserStore>,
        storage: Arc<dyn Storage>,
        publisher: Arc<dyn TicketPublisher>,
        failure_policy: AnalysisFailurePolicy,
    ) -> Self {
        Self {
            analyzer,
            users,
            storage,
            publisher,
            failure_policy,
        }
    }

    /// Screen an uploaded image and either reject it or store and forward it.
    ///
    /// Analysis failures never abort the request; `failure_policy` decides
    /// whether an unanalyzed image is accepted. Lockout, storage and publish
    /// failures propagate.
    #[tracing::instrument(skip(self, user_id, image), fields(user_id = ?user_id, size = image.len()))]
    pub async fn check(&self, user_id: Option<&str>, image: Bytes) -> Result<CheckOutcome, AppError> {
        let start = Instant::now();

        let analysis = self.analyze(image.clone()).await;

        if self.is_flagged(analysis.as_ref()) {
            let locked_out = match (analysis.is_some(), user_id) {
                (true, Some(user_id)) => self.users.lock_out(user_id).await? > 0,
                _ => false,
            };

            tracing::warn!(
                user_id = ?user_id,
                analyzed = analysis.is_some(),
                locked_out,
                "Image rejected by content policy"
            );
            return Ok(CheckOutcome::Rejected { locked_out });
        }

        let storage_key = generate_image_key();
        let image_url = self
            .storage
            .upload_with_key(&storage_key, image, UPLOAD_CONTENT_TYPE)
            .await?;

        let ticket = Ticket::new(user_id.map(String::from), image_url);
        let ticket_id = self.publisher.publish(&ticket).await?;

        tracing::info!(
            storage_key = %storage_key,
            image_url = %ticket.image_url,
            ticket_id = %ticket_id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Image accepted and forwarded"
        );

        Ok(CheckOutcome::Accepted { ticket_id, ticket })
    }

    async fn analyze(&self, image: Bytes) -> Option<ImageAnalysis> {
        match self.analyzer.analyze_adult(image).await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    policy = %self.failure_policy,
                    "Image analysis failed"
                );
                None
            }
        }
    }

    fn is_flagged(&self, analysis: Option<&ImageAnalysis>) -> bool {
        match analysis {
            Some(analysis) => analysis.adult.as_ref().is_some_and(is_inappropriate),
            None => self.failure_policy.rejects_unanalyzed(),
        }
    }
}

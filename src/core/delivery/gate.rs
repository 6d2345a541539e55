//! Skip and mask policy in front of the event sink

use super::sinks::EventSink;
use crate::config::MaskHook;
use crate::core::identity::guarded;
use crate::core::models::Event;
use crate::utils::error::CaptureError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// What happened to an event handed to the gate
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The skip predicate asked for the event to be dropped
    Skipped,
    /// The sink accepted the event
    Sent,
    /// The mask callback panicked; the unmasked event was not sent
    Dropped(CaptureError),
    /// The sink rejected the event or missed the deadline
    Failed(CaptureError),
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }
}

/// Applies skip and mask policy, then submits to the sink
#[derive(Clone)]
pub struct DeliveryGate {
    sink: Arc<dyn EventSink>,
    mask: Option<MaskHook>,
    debug: bool,
    deadline: Option<Duration>,
}

impl DeliveryGate {
    pub fn new(sink: Arc<dyn EventSink>, mask: Option<MaskHook>, debug: bool) -> Self {
        Self {
            sink,
            mask,
            debug,
            deadline: None,
        }
    }

    /// Give up on a submission still pending after `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Forward `event` unless `skip` is set
    ///
    /// Sink failures and missed deadlines are logged and reported through the
    /// outcome; they never propagate to the instrumented handler.
    pub async fn forward(&self, event: Event, skip: bool) -> DeliveryOutcome {
        if skip {
            if self.debug {
                debug!("Skip sending the event to Moesif");
            }
            return DeliveryOutcome::Skipped;
        }

        if self.debug {
            debug!("Sending the event to Moesif");
        }

        let event = match &self.mask {
            Some(mask) => match guarded("mask_event_model", || mask(event)) {
                Ok(masked) => masked,
                Err(e) => {
                    warn!("Dropping event, mask callback failed: {}", e);
                    return DeliveryOutcome::Dropped(e);
                }
            },
            None => event,
        };

        let submitted = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.sink.submit(&event))
                .await
                .unwrap_or(Err(CaptureError::Timeout(deadline))),
            None => self.sink.submit(&event).await,
        };

        match submitted {
            Ok(()) => {
                if self.debug {
                    debug!("Successfully sent event to Moesif");
                }
                DeliveryOutcome::Sent
            }
            Err(e @ CaptureError::Timeout(_)) => {
                warn!("Gave up sending event to Moesif: {}", e);
                DeliveryOutcome::Failed(e)
            }
            Err(e @ CaptureError::Disabled(_)) => {
                debug!("Event not sent, delivery is disabled: {}", e);
                DeliveryOutcome::Failed(e)
            }
            Err(e) => {
                error!("Error while sending event to Moesif: {}", e);
                DeliveryOutcome::Failed(e)
            }
        }
    }
}

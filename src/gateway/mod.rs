//! Streaming completion gateway
//!
//! `Gateway::stream` turns one `CompletionRequest` into an ordered sequence of
//! `NormalizedEvent`s: any number of thinking/message deltas followed by
//! exactly one `Done` or `Error`, unless the consumer cancels first.
//!
//! Each call spawns a session task and a supervisor task. The supervisor
//! watches the session's join handle and converts a panic into a single
//! `Error` event, so a consumer never waits on a session that died silently.

pub mod cancel;
pub mod error;
pub mod session;

pub use cancel::{CancelHandle, CancellationMonitor};
pub use error::GatewayError;
pub use session::{EventSink, Outcome, StreamSession};

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::Stream;
use secrecy::SecretString;
use tokio::sync::mpsc;
use tracing::{error, warn, Instrument};

use crate::config::Config;
use crate::profiles::{resolve_credential, CredentialSet, ProfileStore};
use crate::provider::ProviderKind;
use crate::routes::metrics::{record_session, session_finished, session_started};
use crate::transport::{SessionContext, TransportDispatcher};
use crate::translate::translator_for;
use crate::types::{CompletionRequest, NormalizedEvent};

/// Events buffered between a session and a slow consumer
const EVENT_BUFFER: usize = 64;

/// Everything a session needs, resolved before any network call
#[derive(Debug)]
pub struct PreparedSession {
    pub provider: ProviderKind,
    pub model_id: String,
    pub upstream_model: String,
    pub profile_id: String,
    pub api_key: SecretString,
    pub body: serde_json::Value,
}

/// Consumer side of one session
#[derive(Debug)]
pub struct SessionHandle {
    events: mpsc::Receiver<NormalizedEvent>,
    cancel: CancelHandle,
}

impl SessionHandle {
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Stop the session; no terminal event follows
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Next event, or `None` once the session has ended
    pub async fn next(&mut self) -> Option<NormalizedEvent> {
        self.events.recv().await
    }

    /// Drain every remaining event
    pub async fn collect(mut self) -> Vec<NormalizedEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        events
    }

    /// Event stream; dropping it cancels the session
    pub fn into_stream(self) -> impl Stream<Item = NormalizedEvent> + Send + 'static {
        let SessionHandle { mut events, cancel } = self;
        async_stream::stream! {
            let _guard = cancel.drop_guard();
            while let Some(event) = events.recv().await {
                yield event;
            }
        }
    }
}

/// Entry point for streaming completions
#[derive(Clone)]
pub struct Gateway {
    dispatcher: Arc<TransportDispatcher>,
    profiles: Arc<dyn ProfileStore>,
    credentials: Arc<CredentialSet>,
}

impl Gateway {
    pub fn new(
        dispatcher: TransportDispatcher,
        profiles: Arc<dyn ProfileStore>,
        credentials: CredentialSet,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            profiles,
            credentials: Arc::new(credentials),
        }
    }

    /// Build the gateway from configuration with a pooled HTTP client
    pub fn from_config(config: &Config, profiles: Arc<dyn ProfileStore>) -> Result<Self> {
        // No overall timeout: a response body may stream for minutes
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        let dispatcher =
            TransportDispatcher::new(client, config.endpoints.clone(), config.attribution.clone())
                .with_body_logging(config.debug_enabled);

        Ok(Self::new(dispatcher, profiles, config.credentials.clone()))
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.profiles
    }

    /// Resolve profile, model, provider, credential and payload.
    ///
    /// An empty `profile_id` selects the store's default profile; an empty
    /// `model_id` selects the profile's model.
    pub async fn prepare(
        &self,
        request: &CompletionRequest,
    ) -> Result<PreparedSession, GatewayError> {
        let profile_id = match request.profile_id.trim() {
            "" => self.profiles.default_profile().to_string(),
            id => id.to_string(),
        };
        let profile = self
            .profiles
            .get(&profile_id)
            .await
            .ok_or_else(|| GatewayError::ProfileNotFound(profile_id.clone()))?;

        let model_id = match request.model_id.trim() {
            "" => profile.model_id.clone(),
            model => model.to_string(),
        };
        let provider = ProviderKind::for_model(&model_id);

        let api_key = resolve_credential(provider, Some(&profile), &self.credentials)
            .ok_or(GatewayError::CredentialMissing(provider))?;

        let translator = translator_for(provider);
        let body = translator.translate_request(&model_id, &request.messages)?;
        let upstream_model = translator.upstream_model(&model_id).to_string();

        Ok(PreparedSession {
            provider,
            model_id,
            upstream_model,
            profile_id,
            api_key,
            body,
        })
    }

    /// Start a session. Must be called from within a tokio runtime.
    pub fn stream(&self, request: CompletionRequest) -> SessionHandle {
        let (sender, events) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancelHandle::new();
        let sink = EventSink::new(sender, cancel.clone());

        let gateway = self.clone();
        let session_sink = sink.clone();
        let session = tokio::spawn(async move { gateway.run(request, session_sink).await });

        tokio::spawn(async move {
            if let Err(e) = session.await {
                if e.is_panic() {
                    // Panic payload stays out of the log
                    error!("Session task panicked");
                    let message =
                        GatewayError::Internal("session task panicked".to_string()).to_string();
                    sink.finish(NormalizedEvent::Error(message)).await;
                    record_session("unknown", "internal", 0.0);
                    session_finished();
                }
            }
        });

        SessionHandle { events, cancel }
    }

    async fn run(&self, request: CompletionRequest, sink: EventSink) {
        let started = Instant::now();
        session_started();

        let prepared = match self.prepare(&request).await {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!(
                    profile = %request.profile_id,
                    kind = err.kind(),
                    error = %err,
                    "Session rejected before dispatch"
                );
                sink.finish(NormalizedEvent::Error(err.to_string())).await;
                record_session("none", err.kind(), started.elapsed().as_secs_f64());
                session_finished();
                return;
            }
        };

        let ctx = SessionContext::new(prepared.provider, &prepared.model_id)
            .with_profile(&prepared.profile_id);
        let span = ctx.create_span();
        let provider = prepared.provider;

        let outcome = self
            .dispatch(ctx, prepared, sink)
            .instrument(span)
            .await;

        record_session(provider.slug(), outcome.label(), started.elapsed().as_secs_f64());
        session_finished();
    }

    async fn dispatch(
        &self,
        ctx: SessionContext,
        prepared: PreparedSession,
        sink: EventSink,
    ) -> Outcome {
        ctx.log_session_start();
        let monitor = sink.monitor().clone();
        let mut session = StreamSession::new(ctx.clone(), prepared.api_key.clone(), sink);

        let opened = tokio::select! {
            biased;
            _ = monitor.gone() => None,
            opened = self.dispatcher.open(
                &ctx,
                prepared.provider,
                &prepared.upstream_model,
                &prepared.api_key,
                &prepared.body,
            ) => Some(opened),
        };

        let outcome = match opened {
            None => {
                ctx.log_cancelled();
                Outcome::Cancelled
            }
            Some(Err(err)) => session.fail(err).await,
            Some(Ok(body)) => session.drive(body).await,
        };

        ctx.log_stream_ended(outcome.label(), session.chunks());
        outcome
    }
}

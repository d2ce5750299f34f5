//! Response dispatcher: local match first, streaming fallback second.
//!
//! Owns the dialogue engine, the duplicate-question memory, and the
//! streaming client, and drives the host collaborators (renderer, cue
//! player, animation driver) for every emitted reply.

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use banter_core::config::{AnimationConfig, BanterConfig};
use banter_core::types::{ChatRole, FALLBACK_INTENT, REPEAT_INTENT};
use banter_dialogue::{DialogueEngine, QuestionMemory, RuleStore};
use banter_llm::{LlmError, StreamEvent, StreamingChatClient};

use crate::error::DispatchError;
use crate::modality::{resolve_cue_group, select_trigger};
use crate::traits::{AnimationDriver, CueGroups, CueLibrary, CuePlayer, MessageRenderer, RuleSource};

/// Which path produced a reply's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// A rule keyword matched the utterance.
    Rule,
    /// The utterance was already asked this session.
    Repeat,
    /// The streaming fallback produced the text.
    Generated,
    /// The streaming fallback failed; the store's fallback response was used.
    Recovered,
}

/// One emitted reply: the text plus the intent key that selected its
/// audio cue and animation trigger.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub id: Uuid,
    pub text: String,
    pub intent: String,
    pub source: ReplySource,
    pub created_at: i64,
}

/// The host-supplied collaborator set.
pub struct Collaborators {
    pub rule_source: Box<dyn RuleSource>,
    pub cue_library: Box<dyn CueLibrary>,
    pub cue_player: Box<dyn CuePlayer>,
    pub animation_driver: Box<dyn AnimationDriver>,
    pub renderer: Box<dyn MessageRenderer>,
}

/// Central coordinator wiring the dialogue engine, question memory, and
/// streaming client to the host collaborators.
pub struct ResponseDispatcher {
    engine: DialogueEngine,
    memory: QuestionMemory,
    client: StreamingChatClient,
    animation: AnimationConfig,
    already_asked_response: String,
    cue_groups: CueGroups,
    collaborators: Collaborators,
    started: bool,
}

impl ResponseDispatcher {
    /// Build a dispatcher from configuration and host collaborators.
    ///
    /// The rule store and cue groups stay empty until [`on_start`](Self::on_start).
    pub fn new(
        config: &BanterConfig,
        collaborators: Collaborators,
    ) -> Result<Self, DispatchError> {
        let client = StreamingChatClient::new(config.llm.clone())?;

        Ok(Self {
            engine: DialogueEngine::default(),
            memory: QuestionMemory::new(),
            client,
            animation: config.animation.clone(),
            already_asked_response: config.rules.already_asked_response.clone(),
            cue_groups: CueGroups::new(),
            collaborators,
            started: false,
        })
    }

    /// Host startup hook: load the rule store and cue groups, clear the
    /// question memory, and reset the conversation.
    pub fn on_start(&mut self) {
        let lines = self.collaborators.rule_source.load_rule_lines();
        self.engine = DialogueEngine::new(RuleStore::from_lines(lines));
        self.cue_groups = self.collaborators.cue_library.load_cue_groups();
        self.memory.clear();
        self.client.reset_conversation();
        self.started = true;

        info!(
            rules = self.engine.store().len(),
            cue_groups = self.cue_groups.len(),
            "Dispatcher started"
        );
    }

    /// Host submission hook: resolve one utterance into a reply.
    ///
    /// Repeated questions short-circuit with the fixed "already asked"
    /// response; a rule match answers synchronously; everything else goes to
    /// the streaming fallback, with deltas forwarded to the renderer as they
    /// arrive.
    pub async fn on_submit(&mut self, text: &str) -> Result<Reply, DispatchError> {
        if !self.started {
            return Err(DispatchError::NotReady);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(DispatchError::EmptyInput);
        }

        self.collaborators.renderer.render(text, ChatRole::User);

        if self.memory.accept(text) {
            debug!(utterance = %text, "Repeated question short-circuited");
            let response = self.already_asked_response.clone();
            return Ok(self.emit(response, REPEAT_INTENT, ReplySource::Repeat));
        }

        if let Some(matched) = self.engine.match_utterance(text) {
            let response = matched.response().to_string();
            let keyword = matched.keyword.to_string();
            debug!(keyword = %keyword, "Rule matched");
            return Ok(self.emit(response, &keyword, ReplySource::Rule));
        }

        self.stream_fallback(text).await
    }

    /// Delegate an unmatched utterance to the streaming client.
    async fn stream_fallback(&mut self, text: &str) -> Result<Reply, DispatchError> {
        let mut rx = self.client.send(text)?;

        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Delta(fragment) => {
                    self.collaborators.renderer.render_delta(&fragment);
                }
                StreamEvent::Completed { full_text } => {
                    return Ok(self.emit(full_text, FALLBACK_INTENT, ReplySource::Generated));
                }
                StreamEvent::Failed { status, detail } => {
                    warn!(?status, detail = %detail, "Streaming fallback failed, using canned fallback");
                    let response = self.engine.fallback_response().to_string();
                    return Ok(self.emit(response, FALLBACK_INTENT, ReplySource::Recovered));
                }
            }
        }

        // The turn task always sends a terminal event before closing the
        // channel; reaching here means it died mid-turn.
        Err(DispatchError::Llm(LlmError::Internal(
            "stream closed without a terminal event".to_string(),
        )))
    }

    /// Render a reply and drive the audio/animation modalities for its
    /// intent key.
    fn emit(&self, text: String, intent: &str, source: ReplySource) -> Reply {
        self.collaborators.renderer.render(&text, ChatRole::Assistant);

        match resolve_cue_group(&self.cue_groups, intent) {
            Some((group_key, clips)) => {
                self.collaborators.cue_player.play_from(group_key, clips);
            }
            None => debug!(intent = %intent, "No cue group for intent"),
        }

        let trigger = select_trigger(
            intent,
            &self.animation,
            self.collaborators.animation_driver.as_ref(),
        );
        self.collaborators.animation_driver.fire(trigger);

        Reply {
            id: Uuid::new_v4(),
            text,
            intent: intent.to_string(),
            source,
            created_at: Local::now().timestamp(),
        }
    }

    /// The underlying streaming client (history inspection, manual reset).
    pub fn chat_client(&self) -> &StreamingChatClient {
        &self.client
    }
}

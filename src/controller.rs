//! Sequencing of user actions over the prompt generator.
//!
//! The controller owns the only mutable session data: the latest title and
//! prompt object. Both are replaced wholesale. Every action takes `&mut self`,
//! so at most one request is in flight per controller. Each change is also
//! published as a [`Snapshot`] on a watch channel, so readers never need the
//! controller itself while a request is running.

use crate::{
    error::{PromptError, Result},
    generator::PromptGenerator,
    keyword::KeywordChecker,
    logger,
    models::{CharCount, ImagePrompt, ModificationKind},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    GeneratingTitle,
    GeneratingJson { pending_title: String },
    Modifying { kind: ModificationKind },
    Error { message: String },
    Ready,
}

impl InteractionState {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            InteractionState::GeneratingTitle
                | InteractionState::GeneratingJson { .. }
                | InteractionState::Modifying { .. }
        )
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionState::Idle => write!(f, "idle"),
            InteractionState::GeneratingTitle => write!(f, "generating title"),
            InteractionState::GeneratingJson { .. } => write!(f, "generating json"),
            InteractionState::Modifying { kind } => write!(f, "modifying {}", kind),
            InteractionState::Error { message } => write!(f, "error: {}", message),
            InteractionState::Ready => write!(f, "ready"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyTarget {
    Title,
    Json,
}

/// Everything a front-end needs to render the current session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub state: InteractionState,
    pub loading: bool,
    pub title: Option<String>,
    pub prompt: Option<ImagePrompt>,
    pub prompt_json: Option<String>,
    pub char_count: Option<CharCount>,
    pub last_copied: Option<CopyTarget>,
    pub show_keyword_checker: bool,
    pub keyword_checker_url: Option<String>,
}

pub struct InteractionController {
    generator: PromptGenerator,
    checker: Option<KeywordChecker>,
    state: InteractionState,
    title: Option<String>,
    prompt: Option<ImagePrompt>,
    last_copied: Option<CopyTarget>,
    show_keyword_checker: bool,
    updates: watch::Sender<Snapshot>,
}

impl InteractionController {
    pub fn new(generator: PromptGenerator) -> Self {
        let (updates, _) = watch::channel(Snapshot::default());
        let controller = Self {
            generator,
            checker: None,
            state: InteractionState::Idle,
            title: None,
            prompt: None,
            last_copied: None,
            show_keyword_checker: false,
            updates,
        };
        controller.publish();
        controller
    }

    pub fn with_keyword_checker(mut self, checker: KeywordChecker) -> Self {
        self.checker = Some(checker);
        self.publish();
        self
    }

    /// Receiver that always holds the latest snapshot, including the
    /// loading states entered while an action is awaiting the model.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn prompt(&self) -> Option<&ImagePrompt> {
        self.prompt.as_ref()
    }

    /// Runs a full cycle: title first, then the prompt object seeded by it.
    ///
    /// Previous results are cleared up front. Title and prompt are only
    /// stored together, so a failure in either call leaves both empty.
    pub async fn generate(&mut self, theme: &str) -> Result<()> {
        if theme.trim().is_empty() {
            let err = PromptError::ValidationError("Please enter a theme before generating".into());
            self.fail(&err);
            return Err(err);
        }

        let _timer = logger::timer("generation cycle");
        self.title = None;
        self.prompt = None;
        self.last_copied = None;

        self.transition(InteractionState::GeneratingTitle);
        let title = match self.generator.generate_title(theme).await {
            Ok(title) => title,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        self.transition(InteractionState::GeneratingJson {
            pending_title: title.clone(),
        });
        let prompt = match self.generator.generate_prompt(&title).await {
            Ok(prompt) => prompt,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        self.title = Some(title);
        self.prompt = Some(prompt);
        self.transition(InteractionState::Ready);
        Ok(())
    }

    /// Rewrites the current prompt. Returns `Ok(false)` without doing anything
    /// when there is no prompt yet.
    pub async fn modify(&mut self, kind: ModificationKind) -> Result<bool> {
        let current = match &self.prompt {
            Some(prompt) => prompt.clone(),
            None => {
                log::debug!("Ignoring {} modification: no prompt yet", kind);
                return Ok(false);
            }
        };

        let _timer = logger::timer("prompt modification");
        self.last_copied = None;
        self.transition(InteractionState::Modifying { kind });

        match self.generator.modify_prompt(&current, kind).await {
            Ok(modified) => {
                self.prompt = Some(modified);
                self.transition(InteractionState::Ready);
                Ok(true)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Clipboard payload for `target`, recorded as the last copied item.
    pub fn copy(&mut self, target: CopyTarget) -> Option<String> {
        let payload = match target {
            CopyTarget::Title => self.title.clone(),
            CopyTarget::Json => self
                .prompt
                .as_ref()
                .and_then(|prompt| prompt.to_pretty_json().ok()),
        }?;
        self.last_copied = Some(target);
        self.publish();
        Some(payload)
    }

    pub fn toggle_keyword_checker(&mut self) -> bool {
        self.show_keyword_checker = !self.show_keyword_checker;
        self.publish();
        self.show_keyword_checker
    }

    pub fn keyword_checker_url(&self) -> Option<String> {
        self.checker
            .as_ref()
            .map(|checker| checker.url_for(self.title.as_deref()))
    }

    pub fn char_count(&self) -> Option<CharCount> {
        self.prompt.as_ref().and_then(|prompt| prompt.char_count().ok())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            loading: self.is_loading(),
            title: self.title.clone(),
            prompt: self.prompt.clone(),
            prompt_json: self
                .prompt
                .as_ref()
                .and_then(|prompt| prompt.to_pretty_json().ok()),
            char_count: self.char_count(),
            last_copied: self.last_copied,
            show_keyword_checker: self.show_keyword_checker,
            keyword_checker_url: self.keyword_checker_url(),
        }
    }

    fn fail(&mut self, err: &PromptError) {
        log::error!("Action failed: {}", err);
        self.transition(InteractionState::Error {
            message: err.to_string(),
        });
    }

    fn transition(&mut self, state: InteractionState) {
        log::debug!("State: {} -> {}", self.state, state);
        self.state = state;
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

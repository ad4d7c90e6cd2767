//! Landing page controller.
//!
//! `HomeController` coordinates the conversation resolver, the entry loader,
//! the session synchronizer and the help preference, and derives the
//! [`HomeView`] the presentational layer renders from.
//!
//! # Concurrency
//!
//! Fetches run as tokio tasks and report back over a channel. Their outcomes
//! are only applied inside `&mut self` methods (`next_settlement`,
//! `drain_settlements`), so every state transition is serialized through the
//! controller and the loader's token guard decides what is stale.

use crate::home_view::HomeView;
use anyhow::{Context, Result};
use colloquy_core::config::ConfigurationProvider;
use colloquy_core::conversation::{
    ConversationId, ConversationRepository, ConversationSummary, resolve_most_recent,
};
use colloquy_core::error::ColloquyError;
use colloquy_core::preference::{HelpDocsState, HelpPreference, PreferenceStore};
use colloquy_core::session::{
    ActiveConversationReader, EntryLoader, LoadOutcome, LoadTicket, SessionSynchronizer,
    Settlement, SurfaceVisibility, SyncOutcome, active_conversation,
};
use colloquy_core::settings::{SettingsDialogToggle, SettingsDialogTrigger};
use colloquy_infrastructure::{
    ColloquyPaths, ConfigService, DirConversationRepository, TomlPreferenceStore,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// External collaborators the controller is wired to.
#[derive(Clone)]
pub struct HomeCollaborators {
    pub configuration: Arc<dyn ConfigurationProvider>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub settings_dialog: Arc<dyn SettingsDialogTrigger>,
}

impl HomeCollaborators {
    /// Composition root for the file-backed collaborators under `paths`.
    ///
    /// The configuration file is read in the background, so the first views
    /// may report `is_config_loading`.
    pub async fn from_paths(paths: &ColloquyPaths) -> Result<Self> {
        let configuration =
            Arc::new(ConfigService::new(paths).context("Failed to set up configuration")?);
        let conversations = Arc::new(
            DirConversationRepository::from_paths(paths)
                .context("Failed to set up conversation repository")?,
        );
        let preferences =
            Arc::new(TomlPreferenceStore::new(paths).context("Failed to set up preferences")?);

        let loading = configuration.clone();
        tokio::spawn(async move {
            loading.load().await;
        });

        Ok(Self {
            configuration,
            conversations,
            preferences,
            settings_dialog: Arc::new(SettingsDialogToggle::new()),
        })
    }
}

/// Controller behind the landing page.
pub struct HomeController {
    configuration: Arc<dyn ConfigurationProvider>,
    conversations: Arc<dyn ConversationRepository>,
    settings_dialog: Arc<dyn SettingsDialogTrigger>,
    help: HelpDocsState,
    loader: EntryLoader,
    synchronizer: SessionSynchronizer,
    selected: Option<ConversationSummary>,
    runtime: Handle,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    in_flight: usize,
}

impl HomeController {
    /// Mounts the controller.
    ///
    /// Reads the help preference once. Must be called from within a tokio
    /// runtime; fetches are spawned onto that runtime.
    pub async fn mount(collaborators: HomeCollaborators) -> Self {
        let HomeCollaborators {
            configuration,
            conversations,
            preferences,
            settings_dialog,
        } = collaborators;

        let help = HelpDocsState::load(HelpPreference::new(preferences)).await;
        let (writer, _) = active_conversation();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        tracing::info!("[Home] Mounted (help docs visible: {})", help.visible());

        Self {
            configuration,
            conversations,
            settings_dialog,
            help,
            loader: EntryLoader::new(),
            synchronizer: SessionSynchronizer::new(writer),
            selected: None,
            runtime: Handle::current(),
            outcome_tx,
            outcome_rx,
            in_flight: 0,
        }
    }

    // ============================================================================
    // Conversation selection and loading
    // ============================================================================

    /// Re-resolves the selection from a fresh summary collection.
    ///
    /// Issues a fetch when the selected conversation changed, or when it kept
    /// its id but was modified since the last observation, and re-runs the
    /// synchronizer. Returns the selected id.
    pub fn observe_conversations(
        &mut self,
        conversations: &[ConversationSummary],
    ) -> Option<ConversationId> {
        let previous = self.selected.take();
        self.selected = resolve_most_recent(conversations).cloned();
        let key = self.selected_id();

        if let Some(ticket) = self.loader.request(key.clone()) {
            tracing::info!("[Home] Selected conversation '{}'", ticket.conversation_id);
            self.spawn_fetch(ticket);
        } else if self.selection_modified_since(previous.as_ref()) {
            if let Some(ticket) = self.loader.refresh() {
                tracing::debug!("[Home] '{}' was modified, refetching", ticket.conversation_id);
                self.spawn_fetch(ticket);
            }
        }

        self.synchronize();
        key
    }

    /// Pulls the summary list from the conversation provider and observes it.
    ///
    /// A listing failure keeps the current selection.
    pub async fn refresh_conversations(&mut self) -> Option<ConversationId> {
        match self.conversations.list_summaries().await {
            Ok(summaries) => self.observe_conversations(&summaries),
            Err(e) => {
                tracing::warn!("[Home] Failed to list conversations: {}", e);
                self.selected_id()
            }
        }
    }

    /// Re-fetches the selected conversation's entries.
    pub fn refresh_active_conversation(&mut self) {
        if let Some(ticket) = self.loader.refresh() {
            tracing::debug!("[Home] Refreshing '{}'", ticket.conversation_id);
            self.spawn_fetch(ticket);
        }
    }

    /// Waits for the next fetch to settle and applies it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply(outcome))
    }

    /// Applies every outcome that has already arrived, without waiting.
    pub fn drain_settlements(&mut self) -> Vec<Settlement> {
        let mut settlements = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            settlements.push(self.apply(outcome));
        }
        settlements
    }

    /// Waits until every in-flight fetch has settled.
    pub async fn settle_pending(&mut self) {
        while self.next_settlement().await.is_some() {}
    }

    pub fn pending_fetches(&self) -> usize {
        self.in_flight
    }

    pub fn selected_conversation(&self) -> Option<&ConversationSummary> {
        self.selected.as_ref()
    }

    /// Read-only handle to the active conversation state.
    pub fn active_conversation(&self) -> ActiveConversationReader {
        self.synchronizer.reader()
    }

    // ============================================================================
    // Help overlays
    // ============================================================================

    pub fn help_docs_visible(&self) -> bool {
        self.help.visible()
    }

    /// Hides both help overlays and persists the dismissal.
    pub async fn dismiss_help_docs(&mut self) {
        tracing::info!("[Home] Help docs dismissed");
        self.help.dismiss().await;
    }

    pub async fn set_help_docs_visible(&mut self, visible: bool) {
        self.help.set_visible(visible).await;
    }

    // ============================================================================
    // Settings dialog and conversation browser
    // ============================================================================

    pub fn open_settings(&self) {
        self.settings_dialog.open();
    }

    pub fn close_settings(&self) {
        self.settings_dialog.close();
    }

    /// Opens the conversation browser panel.
    pub async fn open_conversation_browser(&self) {
        self.set_conversation_browser_visible(true).await;
    }

    pub async fn set_conversation_browser_visible(&self, visible: bool) {
        if let Err(e) = self
            .configuration
            .set_conversation_browser_visible(visible)
            .await
        {
            tracing::warn!("[Home] Failed to update conversation browser flag: {}", e);
        }
    }

    // ============================================================================
    // View derivation
    // ============================================================================

    pub async fn view(&self) -> HomeView {
        let config = self.configuration.snapshot().await;
        let help_docs_visible = self.help.visible();

        HomeView {
            is_config_loading: config.is_loading,
            light_mode_enabled: config.light_mode_enabled,
            default_language_model: config.default_language_model,
            is_conversation_browser_visible: config.is_conversation_browser_visible,
            is_settings_open: self.settings_dialog.is_open(),
            selected_conversation: self.selected.clone(),
            help_docs_visible,
            surfaces: SurfaceVisibility::derive(self.selected.is_some(), !help_docs_visible),
            load_state: self.loader.state().clone(),
        }
    }

    fn selected_id(&self) -> Option<ConversationId> {
        self.selected.as_ref().map(|s| s.id.clone())
    }

    fn selection_modified_since(&self, previous: Option<&ConversationSummary>) -> bool {
        match (previous, self.selected.as_ref()) {
            (Some(before), Some(now)) => {
                before.id == now.id && now.last_modified_at > before.last_modified_at
            }
            _ => false,
        }
    }

    /// Runs the fetch on its own task so a panicking repository still
    /// produces an outcome and `in_flight` stays accurate.
    fn spawn_fetch(&mut self, ticket: LoadTicket) {
        let repository = self.conversations.clone();
        let tx = self.outcome_tx.clone();
        let runtime = self.runtime.clone();
        self.in_flight += 1;

        self.runtime.spawn(async move {
            let (token, conversation_id) = (ticket.token, ticket.conversation_id.clone());
            let fetch = runtime.spawn(async move { ticket.fetch(repository.as_ref()).await });

            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("[Home] Fetch task for '{}' failed: {}", conversation_id, e);
                    LoadOutcome {
                        token,
                        conversation_id,
                        result: Err(ColloquyError::internal(format!("fetch task failed: {}", e))),
                    }
                }
            };

            // receiver dropped: controller is gone
            let _ = tx.send(outcome);
        });
    }

    fn apply(&mut self, outcome: LoadOutcome) -> Settlement {
        self.in_flight = self.in_flight.saturating_sub(1);

        let settlement = self.loader.settle(outcome);
        if settlement == Settlement::Applied {
            self.synchronize();
        }
        settlement
    }

    fn synchronize(&self) -> SyncOutcome {
        self.synchronizer
            .synchronize(self.selected.as_ref(), self.loader.state())
    }
}

//! # Application Orchestrator
//!
//! [`App`] coordinates the egui render loop, the spawned Tokio tasks and the
//! shared [`AppState`].
//!
//! ```text
//!  UI thread                          Tokio tasks
//!  ─────────                          ───────────
//!  render() ── UiAction ──► dispatch() ── spawn ──► tasks::*
//!      ▲                                              │
//!      └── on_tick() ◄── AppEvent (async_channel) ────┘
//! ```
//!
//! Only the UI thread writes [`AppState`]. Tasks report results as
//! [`AppEvent`]s and post notifications directly to the shared
//! [`NotificationService`](lib_core::NotificationService).

mod event_handler;
mod events;
mod services;
mod state;
mod tasks;

pub use event_handler::{apply_event, FollowUp};
pub use events::AppEvent;
pub use services::Services;
pub use state::*;

use std::sync::Arc;

use async_channel::{unbounded, Receiver, Sender};
use lib_core::{AppContext, NotificationId};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// Something the user asked for from a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Navigate(Screen),
    RefreshTokens,
    SubmitAction,
    CreateAsset,
    LoadNfts,
    CreateCollection,
    AddToCollection,
    FetchQuote,
    ExecuteSwap,
    ToggleTheme,
    Dismiss(NotificationId),
}

pub struct App {
    pub state: Arc<RwLock<AppState>>,
    pub context: AppContext,
    services: Services,
    event_rx: Receiver<AppEvent>,
    event_tx: Sender<AppEvent>,
}

impl App {
    /// Build the app and start the first discovery pass.
    ///
    /// Must be called with a Tokio runtime entered.
    pub fn new(services: Services, context: AppContext, network: String) -> Self {
        let state = AppState {
            wallet: Some(services.wallet.pubkey()),
            network,
            ..AppState::default()
        };
        let (event_tx, event_rx) = unbounded();

        let mut app = Self {
            state: Arc::new(RwLock::new(state)),
            context,
            services,
            event_rx,
            event_tx,
        };
        app.dispatch(UiAction::RefreshTokens);

        info!("App state initialized");
        app
    }

    /// Drain pending task results. Called once per frame.
    pub fn on_tick(&mut self) {
        let mut follow_ups = Vec::new();
        {
            let mut state = self.state.write();
            while let Ok(event) = self.event_rx.try_recv() {
                if let Some(follow_up) = apply_event(&mut state, event) {
                    follow_ups.push(follow_up);
                }
            }
        }

        follow_ups.dedup();
        for follow_up in follow_ups {
            match follow_up {
                FollowUp::RefreshTokens => self.dispatch(UiAction::RefreshTokens),
            }
        }
    }

    pub fn dispatch(&mut self, action: UiAction) {
        debug!(?action, "UI action");
        let notifications = self.context.notifications.clone();
        let event_tx = self.event_tx.clone();
        let mut state = self.state.write();

        match action {
            UiAction::Navigate(screen) => {
                state.current_screen = screen;
                if screen == Screen::Gallery && state.gallery.nfts.is_empty() && !state.gallery.loading {
                    drop(state);
                    self.dispatch(UiAction::LoadNfts);
                }
            }
            UiAction::RefreshTokens => {
                state.loading += 1;
                state.manager.tokens_loading = true;
                tasks::tokens::fetch_tokens(self.services.clone(), notifications, event_tx);
            }
            UiAction::SubmitAction => {
                let Some(action) = state.manager.pending_action() else {
                    warn!("Submit without a selected token and action");
                    return;
                };
                state.loading += 1;
                state.status_line = None;
                tasks::tokens::run_action(self.services.clone(), notifications, event_tx, action);
            }
            UiAction::CreateAsset => {
                state.loading += 1;
                let request = state.create.form.clone();
                tasks::create::create_asset(self.services.clone(), notifications, event_tx, request);
            }
            UiAction::LoadNfts => {
                state.loading += 1;
                state.gallery.loading = true;
                tasks::tokens::fetch_nfts(self.services.clone(), event_tx);
            }
            UiAction::CreateCollection => {
                state.loading += 1;
                let form = &state.collection;
                let (name, symbol, image_uri) = (form.name.clone(), form.symbol.clone(), form.image_uri.clone());
                tasks::collection::create_collection(
                    self.services.clone(),
                    notifications,
                    event_tx,
                    name,
                    symbol,
                    image_uri,
                );
            }
            UiAction::AddToCollection => {
                state.loading += 1;
                let form = &state.collection;
                let (nft_mint, collection_mint) = (form.nft_mint.clone(), form.collection_mint.clone());
                tasks::collection::add_to_collection(
                    self.services.clone(),
                    notifications,
                    event_tx,
                    nft_mint,
                    collection_mint,
                );
            }
            UiAction::FetchQuote => {
                state.loading += 1;
                state.swap.quote = None;
                let request = state.swap.request.clone();
                tasks::swap::fetch_quote(self.services.clone(), notifications, event_tx, request);
            }
            UiAction::ExecuteSwap => {
                let Some(quote) = state.swap.quote.clone() else {
                    warn!("Swap requested without a quote");
                    return;
                };
                state.loading += 1;
                tasks::swap::execute_swap(self.services.clone(), notifications, event_tx, quote);
            }
            UiAction::ToggleTheme => {
                let dark = self.context.theme.toggle();
                info!(dark, "Theme toggled");
            }
            UiAction::Dismiss(id) => {
                self.context.notifications.remove(id);
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.on_tick();
        crate::ui::render(ctx, self);

        // Task results arrive off-thread; keep polling while flows run.
        let interval = if self.state.read().is_loading() { 100 } else { 500 };
        ctx.request_repaint_after(std::time::Duration::from_millis(interval));
    }
}

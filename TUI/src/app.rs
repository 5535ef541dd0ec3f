use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::backend::{BackendEvent, BackendRequest};
use crate::catalog::{CatalogState, SearchMode};
use crate::config::Config;
use crate::ui_state::UIState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadStatus {
    NotRequested,
    Loading,
    Loaded { at: DateTime<Utc> },
    Failed,
}

pub struct App {
    pub catalog: CatalogState,
    pub ui: UIState,
    pub config: Config,
    pub load_status: LoadStatus,
    pub animation_frame: usize,
    pub animation_tick: u64,
    /// Bumped by every search the user issues
    pub search_generation: u64,
    /// Generation of the description search still awaiting its answer
    pub pending_search: Option<u64>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            catalog: CatalogState::new(),
            ui: UIState::new(),
            config,
            load_status: LoadStatus::NotRequested,
            animation_frame: 0,
            animation_tick: 0,
            search_generation: 0,
            pending_search: None,
            should_quit: false,
        }
    }

    /// Called on first render. Only the first call asks for the catalog.
    pub fn mount(&mut self) -> Option<BackendRequest> {
        if self.load_status != LoadStatus::NotRequested {
            return None;
        }
        self.load_status = LoadStatus::Loading;
        Some(BackendRequest::LoadCatalog)
    }

    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.ui.status_message = Some(message.into());
        self.ui.status_set_at = self.animation_tick;
    }

    pub fn tick(&mut self) {
        self.animation_tick += 1;
        self.animation_frame = (self.animation_frame + 1) % self.config.animation_frame_mod;

        if self.ui.send_animation > 0 {
            self.ui.send_animation -= 1;
        }

        if self.ui.status_message.is_some()
            && self.animation_tick - self.ui.status_set_at >= self.config.status_timeout_ticks
        {
            self.ui.status_message = None;
        }
    }

    /// Apply a user action. Returns the backend work it requires, if any.
    pub fn handle_action(&mut self, action: Action) -> Option<BackendRequest> {
        match action {
            Action::Input(c) => self.catalog.query.push(c),
            Action::Paste(text) => self.catalog.query.push_str(&text),
            Action::Backspace => {
                self.catalog.query.pop();
            }
            Action::Submit => return self.submit(),
            Action::ToggleMode => {
                self.catalog.toggle_mode();
                let label = match self.catalog.mode {
                    SearchMode::Keyword => "Keyword search",
                    SearchMode::Description => "AI description search",
                };
                self.set_status(label);
            }
            Action::ScrollUp => self.scroll_up(self.config.scroll_step),
            Action::ScrollDown => self.scroll_down(self.config.scroll_step),
            Action::PageUp => self.scroll_up(self.config.scroll_step * 3),
            Action::PageDown => self.scroll_down(self.config.scroll_step * 3),
            Action::Escape => {
                if self.catalog.query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.catalog.query.clear();
                }
            }
            // Resolved into `Paste` by the event loop, which owns the clipboard
            Action::ClipboardPaste => {}
            Action::Quit => self.should_quit = true,
        }
        None
    }

    /// Run the search form in the current mode.
    pub fn submit(&mut self) -> Option<BackendRequest> {
        self.search_generation += 1;
        self.ui.send_animation = self.config.send_animation_ticks;
        self.ui.scroll_offset = 0;

        match self.catalog.mode {
            SearchMode::Keyword => {
                self.pending_search = None;
                self.catalog.apply_keyword_search();
                tracing::debug!(
                    query = %self.catalog.query,
                    matches = self.catalog.visible.len(),
                    "Keyword search"
                );
                None
            }
            SearchMode::Description => {
                let generation = self.search_generation;
                self.pending_search = Some(generation);
                tracing::debug!(generation, query = %self.catalog.query, "Description search");
                Some(BackendRequest::Recommend {
                    generation,
                    prompt: self.catalog.prompt(),
                })
            }
        }
    }

    /// Apply a completion coming back from the backend.
    pub fn apply_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::CatalogLoaded(Ok(items)) => {
                tracing::info!(count = items.len(), "Catalog loaded");
                self.catalog.set_catalog(items);
                self.load_status = LoadStatus::Loaded { at: Utc::now() };
            }
            BackendEvent::CatalogLoaded(Err(e)) => {
                tracing::warn!(error = %e, "Failed to load catalog");
                self.catalog.reset_catalog();
                self.load_status = LoadStatus::Failed;
            }
            BackendEvent::Recommendation { generation, result } => {
                if generation != self.search_generation {
                    tracing::debug!(
                        generation,
                        current = self.search_generation,
                        "Discarding stale recommendation"
                    );
                    return;
                }
                self.pending_search = None;
                self.ui.scroll_offset = 0;

                match result {
                    Ok(text) => {
                        self.catalog.apply_recommendation(text);
                        tracing::debug!(
                            matches = self.catalog.visible.len(),
                            "Applied recommendation"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Recommendation request failed");
                        self.catalog.apply_recommendation_failure();
                    }
                }
            }
        }
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.ui.scroll_offset = self.ui.scroll_offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        // The renderer clamps against the real row count
        let max = self.catalog.visible.len().saturating_sub(1);
        self.ui.scroll_offset = (self.ui.scroll_offset + rows).min(max);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

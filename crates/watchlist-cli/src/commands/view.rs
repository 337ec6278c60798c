use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;
use tracing::debug;
use watchlist_config::MessagesConfig;
use watchlist_core::{FabIcon, ScreenHandle, ScreenState, StateObserver};
use watchlist_models::Movie;
use crate::output::Output;

/// Terminal rendition of one screen: consumes its states and keeps the
/// displayed list in sync.
pub struct ScreenView<'a> {
    observer: StateObserver,
    output: &'a Output,
    messages: &'a MessagesConfig,
    image_base_url: &'a str,
    spinner: Option<ProgressBar>,
    movies: Vec<Movie>,
    icon: FabIcon,
    failed: bool,
}

impl<'a> ScreenView<'a> {
    pub fn attach(
        screen: &ScreenHandle,
        output: &'a Output,
        messages: &'a MessagesConfig,
        image_base_url: &'a str,
    ) -> Self {
        Self {
            observer: screen.attach(),
            output,
            messages,
            image_base_url,
            spinner: None,
            movies: Vec::new(),
            icon: FabIcon::Add,
            failed: false,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn icon(&self) -> FabIcon {
        self.icon
    }

    /// Whether any request since attaching ended in an error
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// 1-based lookup into the displayed list
    pub fn movie_at(&self, number: usize) -> Result<Movie> {
        number
            .checked_sub(1)
            .and_then(|index| self.movies.get(index))
            .cloned()
            .ok_or_else(|| eyre!("No movie #{} in the list ({} shown)", number, self.movies.len()))
    }

    /// Render states until the running request finishes
    pub async fn settle(&mut self) -> Result<()> {
        loop {
            let state = self.next().await?;
            let idle = state == ScreenState::Progress(false);
            self.render(state);
            if idle {
                return Ok(());
            }
        }
    }

    /// Render and return the next state
    pub async fn next(&mut self) -> Result<ScreenState> {
        let state = self
            .observer
            .next()
            .await
            .ok_or_else(|| eyre!("Screen closed unexpectedly"))?;
        debug!(?state, "Screen state");

        if !self.output.is_human() {
            self.output.json(&serde_json::to_value(&state)?);
        }
        Ok(state)
    }

    /// Next state, which must be a prompt or a navigation request
    pub async fn next_prompt(&mut self) -> Result<ScreenState> {
        loop {
            let state = self.next().await?;
            match state {
                ScreenState::ShowDeleteConfirmation | ScreenState::NavigateToSearch => return Ok(state),
                other => self.render(other),
            }
        }
    }

    fn render(&mut self, state: ScreenState) {
        if let Some(visible) = state.progress_visible() {
            self.set_progress(visible);
        }

        match state {
            ScreenState::Loading | ScreenState::Progress(_) => {}
            ScreenState::Data(movies) => {
                self.output.movies(&movies, self.image_base_url);
                self.movies = movies;
            }
            ScreenState::Empty => {
                self.movies.clear();
                if self.output.is_human() {
                    self.output.info("Nothing to show.");
                }
            }
            ScreenState::Error(notice) => {
                self.failed = true;
                if self.output.is_human() {
                    self.output.error(self.messages.text(notice));
                }
            }
            ScreenState::Completed(notice) => {
                if self.output.is_human() {
                    self.output.success(self.messages.text(notice));
                }
            }
            ScreenState::UpdateData { removed, notice } => {
                self.movies.retain(|m| !removed.contains(m));
                if self.output.is_human() {
                    self.output.success(self.messages.text(notice));
                }
            }
            ScreenState::FloatingActionButtonImage(icon) => self.icon = icon,
            ScreenState::ShowDeleteConfirmation | ScreenState::NavigateToSearch => {
                debug!("Prompt state outside of a prompt, ignoring");
            }
        }
    }

    fn set_progress(&mut self, visible: bool) {
        if !visible {
            if let Some(spinner) = self.spinner.take() {
                spinner.finish_and_clear();
            }
            return;
        }

        if self.spinner.is_some() || !self.output.is_human() || self.output.is_quiet() {
            return;
        }
        if !std::io::stderr().is_terminal() {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
        {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        spinner.set_message("Working...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }
}

impl Drop for ScreenView<'_> {
    fn drop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

use std::collections::HashMap;
use tracing::{debug, error, trace, warn};
use watchlist_models::{Movie, MovieCategory, Notice};
use crate::intent::{Dispatch, Intent, Outcome, Request, RequestToken, Response};
use crate::selection::SelectionTracker;
use crate::state::ScreenState;

/// Which screen a machine drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Watchlist,
    Movies(MovieCategory),
    Search,
}

/// What the runtime must do after an input was handled: emit `states` in
/// order, abort `cancel` if it is still running, then start `dispatch`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub states: Vec<ScreenState>,
    pub dispatch: Option<Dispatch>,
    pub cancel: Option<RequestToken>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn emit(states: Vec<ScreenState>) -> Self {
        Self {
            states,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.dispatch.is_none() && self.cancel.is_none()
    }
}

#[derive(Debug, Clone)]
enum Pending {
    Read,
    Save,
    Delete(Vec<Movie>),
}

/// Screen state machine.
///
/// Pure with respect to I/O: intents and request outcomes go in, state
/// sequences and data source requests come out. All per-screen mutable state
/// (displayed list, selection, outstanding requests) lives here and is only
/// touched from the screen's own task.
#[derive(Debug)]
pub struct ScreenMachine {
    kind: ScreenKind,
    displayed: Vec<Movie>,
    selection: SelectionTracker,
    pending: HashMap<RequestToken, Pending>,
    current_read: Option<RequestToken>,
    last_query: Option<String>,
    next_token: u64,
}

impl ScreenMachine {
    pub fn new(kind: ScreenKind) -> Self {
        Self {
            kind,
            displayed: Vec::new(),
            selection: SelectionTracker::new(),
            pending: HashMap::new(),
            current_read: None,
            last_query: None,
            next_token: 0,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn displayed(&self) -> &[Movie] {
        &self.displayed
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Number of requests whose outcome has not been handled yet
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Transition {
        trace!(kind = ?self.kind, ?intent, "Handling intent");

        match (self.kind, intent) {
            (ScreenKind::Watchlist, Intent::Load) => self.start_read(Request::ListSaved),
            (ScreenKind::Movies(category), Intent::Load) => {
                self.start_read(Request::FetchCatalog { category, page: 1 })
            }
            (ScreenKind::Movies(category), Intent::LoadPage(page)) => {
                self.start_read(Request::FetchCatalog { category, page: page.max(1) })
            }
            (ScreenKind::Search, Intent::Load) => match self.last_query.clone() {
                Some(query) => self.start_read(Request::Search { query, page: 1 }),
                None => Transition::emit(vec![ScreenState::Empty]),
            },
            (ScreenKind::Search, Intent::Search(query)) => self.search(query),
            (ScreenKind::Movies(_) | ScreenKind::Search, Intent::AddToWatchlist(movie)) => {
                self.start_write(Request::Save(movie), Pending::Save)
            }
            (ScreenKind::Watchlist, Intent::CheckItem { movie, checked }) => {
                self.check_item(movie, checked)
            }
            (ScreenKind::Watchlist, Intent::FloatingActionButtonClick) => {
                Transition::emit(vec![self.selection.fab_action()])
            }
            (ScreenKind::Watchlist, Intent::ConfirmDelete) => self.confirm_delete(),
            (ScreenKind::Watchlist, Intent::ReconcileList(current)) => self.reconcile(current),
            (kind, intent) => {
                warn!(?kind, ?intent, "Intent not supported by this screen, ignoring");
                Transition::none()
            }
        }
    }

    pub fn handle_outcome(&mut self, outcome: Outcome) -> Transition {
        let Outcome { token, result } = outcome;

        let Some(pending) = self.pending.remove(&token) else {
            debug!(%token, "Discarding outcome of superseded request");
            return Transition::none();
        };

        match (pending, result) {
            (Pending::Read, Ok(Response::Movies(movies))) => {
                self.current_read = None;
                self.read_succeeded(movies)
            }
            (Pending::Read, Err(e)) => {
                self.current_read = None;
                error!(kind = ?self.kind, "Failed to load movies: {}", e);
                let mut states = vec![ScreenState::Error(Notice::GeneralError)];
                if self.kind == ScreenKind::Watchlist {
                    states.push(ScreenState::FloatingActionButtonImage(self.selection.fab_icon()));
                }
                states.push(ScreenState::Progress(false));
                Transition::emit(states)
            }
            (Pending::Save, Ok(_)) => Transition::emit(vec![
                ScreenState::Completed(Notice::MovieAdded),
                ScreenState::Progress(false),
            ]),
            (Pending::Delete(removed), Ok(_)) => self.delete_succeeded(removed),
            (Pending::Save | Pending::Delete(_), Err(e)) => {
                error!(kind = ?self.kind, "Failed to update watchlist: {}", e);
                Transition::emit(vec![
                    ScreenState::Error(Notice::GeneralError),
                    ScreenState::Progress(false),
                ])
            }
            (Pending::Read, Ok(other)) => {
                self.current_read = None;
                Self::unexpected_response(other)
            }
        }
    }

    fn next_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }

    /// Start a read, superseding the one in flight if any
    fn start_read(&mut self, request: Request) -> Transition {
        let cancel = self.supersede_read();
        let token = self.next_token();
        self.pending.insert(token, Pending::Read);
        self.current_read = Some(token);
        debug!(%token, ?request, "Starting read");

        Transition {
            states: vec![ScreenState::Loading],
            dispatch: Some(Dispatch { token, request }),
            cancel,
        }
    }

    fn start_write(&mut self, request: Request, pending: Pending) -> Transition {
        let token = self.next_token();
        self.pending.insert(token, pending);
        debug!(%token, ?request, "Starting write");

        Transition {
            states: vec![ScreenState::Progress(true)],
            dispatch: Some(Dispatch { token, request }),
            cancel: None,
        }
    }

    fn supersede_read(&mut self) -> Option<RequestToken> {
        let previous = self.current_read.take()?;
        self.pending.remove(&previous);
        debug!(token = %previous, "Superseding in-flight read");
        Some(previous)
    }

    fn search(&mut self, query: String) -> Transition {
        let query = query.trim().to_string();
        if query.is_empty() {
            self.last_query = None;
            self.displayed.clear();
            let cancel = self.supersede_read();
            let mut states = vec![ScreenState::Empty];
            if cancel.is_some() {
                // The superseded read had turned progress on
                states.push(ScreenState::Progress(false));
            }
            return Transition {
                states,
                dispatch: None,
                cancel,
            };
        }

        self.last_query = Some(query.clone());
        self.start_read(Request::Search { query, page: 1 })
    }

    fn read_succeeded(&mut self, movies: Vec<Movie>) -> Transition {
        let mut states = Vec::with_capacity(3);

        if movies.is_empty() {
            self.displayed.clear();
            states.push(ScreenState::Empty);
        } else {
            self.displayed = movies.clone();
            states.push(ScreenState::Data(movies));
        }

        if self.kind == ScreenKind::Watchlist {
            self.selection.retain_displayed(&self.displayed);
            states.push(ScreenState::FloatingActionButtonImage(self.selection.fab_icon()));
        }

        states.push(ScreenState::Progress(false));
        Transition::emit(states)
    }

    fn check_item(&mut self, movie: Movie, checked: bool) -> Transition {
        let icon = if checked {
            if self.displayed.contains(&movie) {
                self.selection.check(movie)
            } else {
                warn!(title = ?movie.display_title(), "Checked movie is not displayed, ignoring");
                self.selection.fab_icon()
            }
        } else {
            self.selection.uncheck(&movie)
        };

        Transition::emit(vec![ScreenState::FloatingActionButtonImage(icon)])
    }

    fn confirm_delete(&mut self) -> Transition {
        if self.selection.is_empty() {
            warn!("Delete confirmed with nothing selected, ignoring");
            return Transition::none();
        }

        let snapshot = self.selection.snapshot();
        self.start_write(
            Request::DeleteMany(snapshot.clone()),
            Pending::Delete(snapshot),
        )
    }

    fn delete_succeeded(&mut self, removed: Vec<Movie>) -> Transition {
        self.displayed.retain(|m| !removed.contains(m));
        self.selection.clear();

        let notice = SelectionTracker::deletion_notice(removed.len());
        let mut states = vec![ScreenState::UpdateData { removed, notice }];
        if self.displayed.is_empty() {
            states.push(ScreenState::Empty);
        }
        states.push(ScreenState::FloatingActionButtonImage(self.selection.fab_icon()));

        // A read in flight may have listed the store before the delete committed
        if self.current_read.is_some() {
            let mut reload = self.start_read(Request::ListSaved);
            states.append(&mut reload.states);
            reload.states = states;
            return reload;
        }

        states.push(ScreenState::Progress(false));
        Transition::emit(states)
    }

    fn reconcile(&mut self, current: Vec<Movie>) -> Transition {
        self.selection.clear();
        self.displayed = current;

        if self.displayed.is_empty() {
            Transition::emit(vec![ScreenState::Empty])
        } else {
            Transition::emit(vec![ScreenState::FloatingActionButtonImage(self.selection.fab_icon())])
        }
    }

    fn unexpected_response(response: Response) -> Transition {
        error!(?response, "Read completed with a non-list response");
        Transition::emit(vec![
            ScreenState::Error(Notice::GeneralError),
            ScreenState::Progress(false),
        ])
    }
}

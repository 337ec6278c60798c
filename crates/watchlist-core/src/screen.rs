use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle, JoinSet};
use tracing::{debug, error, info, trace};
use watchlist_sources::MovieDataSource;
use crate::bridge::{StateBridge, StateObserver};
use crate::error::CoreError;
use crate::intent::{Dispatch, Intent, Outcome, RequestToken};
use crate::machine::{ScreenKind, ScreenMachine, Transition};

enum Command {
    Intent(Intent),
    Dispose,
}

/// A running screen.
///
/// Intents are handled one at a time on the screen's own task, so every state
/// a screen emits comes from a single sequence. Data source calls run as
/// child tasks and are aborted when the screen is disposed or dropped.
pub struct ScreenHandle {
    kind: ScreenKind,
    commands: mpsc::UnboundedSender<Command>,
    bridge: StateBridge,
    task: Option<JoinHandle<()>>,
}

impl ScreenHandle {
    /// Start a screen on the current tokio runtime
    pub fn spawn(kind: ScreenKind, source: Arc<dyn MovieDataSource>) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let bridge = StateBridge::new();

        let actor = ScreenActor {
            machine: ScreenMachine::new(kind),
            bridge: bridge.clone(),
            source,
            in_flight: JoinSet::new(),
            handles: HashMap::new(),
        };
        let task = tokio::spawn(actor.run(rx));
        debug!(?kind, "Screen started");

        Self {
            kind,
            commands,
            bridge,
            task: Some(task),
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    /// Attach a view. Only states emitted from now on are delivered.
    pub fn attach(&self) -> StateObserver {
        self.bridge.attach()
    }

    pub fn detach(&self) {
        self.bridge.detach();
    }

    pub fn send(&self, intent: Intent) -> Result<(), CoreError> {
        self.commands
            .send(Command::Intent(intent))
            .map_err(|_| CoreError::ScreenClosed)
    }

    /// Stop the screen and abort its in-flight requests. No state is emitted
    /// afterwards and the attached observer's stream ends.
    pub async fn dispose(mut self) -> Result<(), CoreError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        // The task may already be gone; awaiting it tells us how it ended
        let _ = self.commands.send(Command::Dispose);
        task.await?;
        Ok(())
    }
}

impl Drop for ScreenHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.bridge.detach();
        }
    }
}

struct ScreenActor {
    machine: ScreenMachine,
    bridge: StateBridge,
    source: Arc<dyn MovieDataSource>,
    in_flight: JoinSet<Outcome>,
    handles: HashMap<RequestToken, AbortHandle>,
}

impl ScreenActor {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Intent(intent)) => {
                        let transition = self.machine.handle_intent(intent);
                        self.apply(transition);
                    }
                    Some(Command::Dispose) | None => break,
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok(outcome) => {
                            self.handles.remove(&outcome.token);
                            let transition = self.machine.handle_outcome(outcome);
                            self.apply(transition);
                        }
                        Err(e) if e.is_cancelled() => trace!("Request task aborted"),
                        Err(e) => error!("Request task failed: {}", e),
                    }
                }
            }
        }

        self.in_flight.abort_all();
        self.bridge.detach();
        info!(kind = ?self.machine.kind(), "Screen disposed");
    }

    fn apply(&mut self, transition: Transition) {
        let Transition { states, dispatch, cancel } = transition;

        if let Some(token) = cancel {
            if let Some(handle) = self.handles.remove(&token) {
                handle.abort();
                debug!(%token, "Aborted superseded request");
            }
        }

        for state in states {
            self.bridge.emit(state);
        }

        if let Some(dispatch) = dispatch {
            self.start(dispatch);
        }
    }

    fn start(&mut self, dispatch: Dispatch) {
        let Dispatch { token, request } = dispatch;
        let source = Arc::clone(&self.source);

        let handle = self.in_flight.spawn(async move {
            let result = AssertUnwindSafe(request.execute(source.as_ref()))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(CoreError::TaskPanicked(panic_message(panic))));
            Outcome { token, result }
        });
        self.handles.insert(token, handle);
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use watchlist_models::{CatalogPage, Movie, MovieCategory, Notice};
    use watchlist_sources::SourceError;
    use crate::state::{FabIcon, ScreenState};

    const SLOW: Duration = Duration::from_millis(300);

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id: Some(id),
            title: Some(title.to_string()),
            ..Movie::default()
        }
    }

    fn page(results: Vec<Movie>) -> CatalogPage {
        CatalogPage {
            page: 1,
            total_pages: 1,
            total_results: results.len() as u32,
            results,
        }
    }

    /// In-memory data source. Queries containing "slow" take a while,
    /// upcoming movies panic, and deletes fail when `fail_delete` is set.
    /// With `slow_list` the watchlist is copied first and returned late, while
    /// deletes commit shortly after they start.
    #[derive(Default)]
    struct FakeSource {
        popular: Vec<Movie>,
        saved: Mutex<Vec<Movie>>,
        fail_delete: bool,
        slow_list: bool,
    }

    #[async_trait]
    impl MovieDataSource for FakeSource {
        async fn fetch_popular(&self, _page: u32) -> Result<CatalogPage, SourceError> {
            Ok(page(self.popular.clone()))
        }

        async fn fetch_upcoming(&self, _page: u32) -> Result<CatalogPage, SourceError> {
            panic!("upcoming is broken");
        }

        async fn search(&self, query: &str, _page: u32) -> Result<CatalogPage, SourceError> {
            if query.contains("slow") {
                tokio::time::sleep(SLOW).await;
            }
            Ok(page(vec![movie(1, query)]))
        }

        async fn list_saved(&self) -> Result<Vec<Movie>, SourceError> {
            let saved = self.saved.lock().unwrap().clone();
            if self.slow_list {
                tokio::time::sleep(SLOW).await;
            }
            Ok(saved)
        }

        async fn save(&self, movie: &Movie) -> Result<(), SourceError> {
            self.saved.lock().unwrap().push(movie.clone());
            Ok(())
        }

        async fn delete_many(&self, movies: &[Movie]) -> Result<(), SourceError> {
            if self.fail_delete {
                return Err(SourceError::Config("read-only".to_string()));
            }
            if self.slow_list {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            self.saved.lock().unwrap().retain(|m| !movies.contains(m));
            Ok(())
        }
    }

    /// Read states until progress turns off
    async fn until_idle(observer: &mut StateObserver) -> Vec<ScreenState> {
        let mut states = Vec::new();
        while let Some(state) = observer.next().await {
            let done = state == ScreenState::Progress(false);
            states.push(state);
            if done {
                break;
            }
        }
        states
    }

    fn watchlist(saved: Vec<Movie>, fail_delete: bool) -> ScreenHandle {
        let source = FakeSource {
            saved: Mutex::new(saved),
            fail_delete,
            ..FakeSource::default()
        };
        ScreenHandle::spawn(ScreenKind::Watchlist, Arc::new(source))
    }

    #[tokio::test]
    async fn test_popular_screen_loads_titanic() {
        let source = FakeSource {
            popular: vec![movie(1, "Titanic")],
            ..FakeSource::default()
        };
        let screen = ScreenHandle::spawn(ScreenKind::Movies(MovieCategory::Popular), Arc::new(source));
        let mut observer = screen.attach();

        screen.send(Intent::Load).unwrap();
        assert_eq!(
            until_idle(&mut observer).await,
            vec![
                ScreenState::Loading,
                ScreenState::Data(vec![movie(1, "Titanic")]),
                ScreenState::Progress(false),
            ]
        );

        screen.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_request_becomes_error() {
        let screen = ScreenHandle::spawn(
            ScreenKind::Movies(MovieCategory::Upcoming),
            Arc::new(FakeSource::default()),
        );
        let mut observer = screen.attach();

        screen.send(Intent::Load).unwrap();
        assert_eq!(
            until_idle(&mut observer).await,
            vec![
                ScreenState::Loading,
                ScreenState::Error(Notice::GeneralError),
                ScreenState::Progress(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_latest_search_wins() {
        let screen = ScreenHandle::spawn(ScreenKind::Search, Arc::new(FakeSource::default()));
        let mut observer = screen.attach();

        screen.send(Intent::Search("slow titanic".to_string())).unwrap();
        screen.send(Intent::Search("nemo".to_string())).unwrap();

        assert_eq!(
            until_idle(&mut observer).await,
            vec![
                ScreenState::Loading,
                ScreenState::Loading,
                ScreenState::Data(vec![movie(1, "nemo")]),
                ScreenState::Progress(false),
            ]
        );

        // The superseded search never reports back
        tokio::time::sleep(SLOW * 2).await;
        assert_eq!(observer.try_next(), None);
    }

    #[tokio::test]
    async fn test_delete_selected_movies() {
        let a = movie(1, "A");
        let b = movie(2, "B");
        let screen = watchlist(vec![a.clone(), b.clone()], false);
        let mut observer = screen.attach();

        screen.send(Intent::Load).unwrap();
        until_idle(&mut observer).await;

        screen.send(Intent::CheckItem { movie: a.clone(), checked: true }).unwrap();
        screen.send(Intent::FloatingActionButtonClick).unwrap();
        assert_eq!(
            observer.next().await,
            Some(ScreenState::FloatingActionButtonImage(FabIcon::Delete))
        );
        assert_eq!(observer.next().await, Some(ScreenState::ShowDeleteConfirmation));

        screen.send(Intent::ConfirmDelete).unwrap();
        assert_eq!(
            until_idle(&mut observer).await,
            vec![
                ScreenState::Progress(true),
                ScreenState::UpdateData { removed: vec![a], notice: Notice::MovieDeleted },
                ScreenState::FloatingActionButtonImage(FabIcon::Add),
                ScreenState::Progress(false),
            ]
        );

        // A fresh load only sees what is left
        screen.send(Intent::Load).unwrap();
        let states = until_idle(&mut observer).await;
        assert!(states.contains(&ScreenState::Data(vec![b])));
    }

    #[tokio::test]
    async fn test_read_started_before_delete_does_not_resurrect_movie() {
        let a = movie(1, "A");
        let b = movie(2, "B");
        let source = FakeSource {
            saved: Mutex::new(vec![a.clone(), b.clone()]),
            slow_list: true,
            ..FakeSource::default()
        };
        let screen = ScreenHandle::spawn(ScreenKind::Watchlist, Arc::new(source));
        let mut observer = screen.attach();

        screen.send(Intent::Load).unwrap();
        until_idle(&mut observer).await;
        screen.send(Intent::CheckItem { movie: a.clone(), checked: true }).unwrap();
        observer.next().await;

        screen.send(Intent::ConfirmDelete).unwrap();
        screen.send(Intent::Load).unwrap();

        assert_eq!(
            until_idle(&mut observer).await,
            vec![
                ScreenState::Progress(true),
                ScreenState::Loading,
                ScreenState::UpdateData { removed: vec![a], notice: Notice::MovieDeleted },
                ScreenState::FloatingActionButtonImage(FabIcon::Add),
                ScreenState::Loading,
                ScreenState::Data(vec![b]),
                ScreenState::FloatingActionButtonImage(FabIcon::Add),
                ScreenState::Progress(false),
            ]
        );

        tokio::time::sleep(SLOW * 2).await;
        assert_eq!(observer.try_next(), None);
    }

    #[tokio::test]
    async fn test_drop_with_request_in_flight_ends_stream() {
        let screen = ScreenHandle::spawn(ScreenKind::Search, Arc::new(FakeSource::default()));
        let mut observer = screen.attach();

        screen.send(Intent::Search("slow nemo".to_string())).unwrap();
        assert_eq!(observer.next().await, Some(ScreenState::Loading));

        drop(screen);
        assert_eq!(observer.next().await, None);

        tokio::time::sleep(SLOW * 2).await;
        assert_eq!(observer.try_next(), None);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_selection() {
        let a = movie(1, "A");
        let b = movie(2, "B");
        let screen = watchlist(vec![a.clone(), b.clone()], true);
        let mut observer = screen.attach();

        screen.send(Intent::Load).unwrap();
        until_idle(&mut observer).await;
        screen.send(Intent::CheckItem { movie: a, checked: true }).unwrap();
        screen.send(Intent::CheckItem { movie: b, checked: true }).unwrap();
        observer.next().await;
        observer.next().await;

        screen.send(Intent::ConfirmDelete).unwrap();
        assert_eq!(
            until_idle(&mut observer).await,
            vec![
                ScreenState::Progress(true),
                ScreenState::Error(Notice::GeneralError),
                ScreenState::Progress(false),
            ]
        );

        // Selection survived, so the button still asks for confirmation
        screen.send(Intent::FloatingActionButtonClick).unwrap();
        assert_eq!(observer.next().await, Some(ScreenState::ShowDeleteConfirmation));
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let source: Arc<dyn MovieDataSource> = Arc::new(FakeSource::default());
        let search = ScreenHandle::spawn(ScreenKind::Search, Arc::clone(&source));
        let mut observer = search.attach();

        let nemo = movie(7, "Finding Nemo");
        search.send(Intent::AddToWatchlist(nemo.clone())).unwrap();
        assert_eq!(
            until_idle(&mut observer).await,
            vec![
                ScreenState::Progress(true),
                ScreenState::Completed(Notice::MovieAdded),
                ScreenState::Progress(false),
            ]
        );

        let saved = ScreenHandle::spawn(ScreenKind::Watchlist, source);
        let mut observer = saved.attach();
        saved.send(Intent::Load).unwrap();
        let states = until_idle(&mut observer).await;
        assert_eq!(states[1], ScreenState::Data(vec![nemo]));
    }

    #[tokio::test]
    async fn test_dispose_ends_stream_without_more_states() {
        let screen = ScreenHandle::spawn(ScreenKind::Search, Arc::new(FakeSource::default()));
        let mut observer = screen.attach();

        screen.send(Intent::Search("slow nemo".to_string())).unwrap();
        assert_eq!(observer.next().await, Some(ScreenState::Loading));

        screen.dispose().await.unwrap();
        assert_eq!(observer.next().await, None);
    }

    #[tokio::test]
    async fn test_detached_states_are_not_replayed() {
        let screen = watchlist(vec![movie(1, "A")], false);

        screen.send(Intent::Load).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut observer = screen.attach();
        assert_eq!(observer.try_next(), None);

        // Reattaching views ask for a reload
        screen.send(Intent::Load).unwrap();
        assert_eq!(observer.next().await, Some(ScreenState::Loading));
    }

    #[tokio::test]
    async fn test_send_after_dispose_fails() {
        let screen = ScreenHandle::spawn(ScreenKind::Search, Arc::new(FakeSource::default()));
        screen.commands.send(Command::Dispose).ok();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(screen.send(Intent::Load), Err(CoreError::ScreenClosed)));
    }
}

use color_eyre::Result;
use std::process::ExitCode;
use watchlist_core::{Intent, NavigationTarget};
use crate::context::AppContext;
use crate::output::Output;
use super::view::ScreenView;

pub async fn run_search(
    ctx: &AppContext,
    query: &str,
    add: Option<usize>,
    output: &Output,
) -> Result<ExitCode> {
    let screen = ctx.navigator.open(NavigationTarget::Search);
    let mut view = ScreenView::attach(&screen, output, &ctx.config.messages, ctx.image_base_url());

    screen.send(Intent::Search(query.to_string()))?;
    if query.trim().is_empty() {
        // A blank query only clears the results
        view.next().await?;
        output.info("Enter a title to search for.");
    } else {
        view.settle().await?;
    }

    if let Some(number) = add {
        if !view.failed() {
            let movie = view.movie_at(number)?;
            screen.send(Intent::AddToWatchlist(movie))?;
            view.settle().await?;
        }
    }

    let failed = view.failed();
    drop(view);
    screen.dispose().await?;

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

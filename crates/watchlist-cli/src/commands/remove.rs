use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, MultiSelect};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{debug, info};
use watchlist_core::{Intent, NavigationTarget, Navigator, ScreenState};
use watchlist_models::Movie;
use crate::context::AppContext;
use crate::output::Output;
use super::view::ScreenView;

/// `watchlist remove [N...]`: select watchlist entries and delete them after
/// confirmation.
pub async fn run_remove(
    ctx: &AppContext,
    numbers: Vec<usize>,
    yes: bool,
    output: &Output,
) -> Result<ExitCode> {
    let screen = ctx.navigator.open(NavigationTarget::Watchlist);
    let mut view = ScreenView::attach(&screen, output, &ctx.config.messages, ctx.image_base_url());

    screen.send(Intent::Load)?;
    view.settle().await?;
    if view.failed() {
        return Ok(ExitCode::FAILURE);
    }

    let selected = if numbers.is_empty() {
        pick_interactively(view.movies())?
    } else {
        let picked = numbers
            .iter()
            .map(|&n| view.movie_at(n))
            .collect::<Result<Vec<_>>>()?;
        distinct(picked)
    };

    let count = selected.len();
    for movie in selected {
        screen.send(Intent::CheckItem { movie, checked: true })?;
    }
    screen.send(Intent::FloatingActionButtonClick)?;

    let prompt = view.next_prompt().await?;
    debug!(icon = ?view.icon(), "Selection complete");

    if let Some(target) = Navigator::target_for(&prompt) {
        // Nothing selected: the button leads to search instead
        info!(?target, "Nothing selected");
        output.info("Nothing selected. Find movies to add with 'watchlist search <title>'.");
        drop(view);
        screen.dispose().await?;
        return Ok(ExitCode::SUCCESS);
    }

    debug_assert_eq!(prompt, ScreenState::ShowDeleteConfirmation);
    if !yes && !confirm_delete(count)? {
        output.info("Cancelled.");
        drop(view);
        screen.dispose().await?;
        return Ok(ExitCode::SUCCESS);
    }

    screen.send(Intent::ConfirmDelete)?;
    view.settle().await?;

    if output.is_human() && !view.movies().is_empty() {
        output.movies(view.movies(), ctx.image_base_url());
    }

    let failed = view.failed();
    drop(view);
    screen.dispose().await?;

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn pick_interactively(movies: &[Movie]) -> Result<Vec<Movie>> {
    if movies.is_empty() {
        return Ok(Vec::new());
    }
    if !std::io::stdin().is_terminal() {
        return Err(eyre!("Pass the numbers to remove when not running interactively"));
    }

    let titles: Vec<&str> = movies
        .iter()
        .map(|m| m.display_title().unwrap_or("(untitled)"))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Select movies to remove (space to toggle, enter to confirm)")
        .items(&titles)
        .interact()
        .map_err(|e| eyre!("Failed to read selection: {}", e))?;

    Ok(chosen.into_iter().map(|index| movies[index].clone()).collect())
}

/// Drop repeats, keeping first-seen order
fn distinct(movies: Vec<Movie>) -> Vec<Movie> {
    let mut unique: Vec<Movie> = Vec::with_capacity(movies.len());
    for movie in movies {
        if !unique.contains(&movie) {
            unique.push(movie);
        }
    }
    unique
}

fn confirm_delete(count: usize) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(eyre!("Refusing to delete without confirmation; pass --yes"));
    }

    Confirm::new()
        .with_prompt(format!("Delete {} movie(s) from your watchlist?", count))
        .default(false)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::process::ExitCode;
use tracing::info;
use watchlist_core::{Intent, MainState, NavigationTarget};
use crate::context::AppContext;
use crate::output::Output;
use super::view::ScreenView;

/// `watchlist show <menu item>`: navigate to a menu screen, list it and
/// optionally add one of the listed movies.
pub async fn run_show(
    ctx: &AppContext,
    menu_item: &str,
    page: Option<u32>,
    add: Option<usize>,
    output: &Output,
) -> Result<ExitCode> {
    let target = match ctx.navigator.select_menu_item(menu_item) {
        MainState::ShowScreen { target, selected_index } => {
            info!(?target, selected_index, "Showing screen");
            target
        }
        MainState::Error { notice } => {
            output.error(ctx.config.messages.text(notice));
            output.info("Available: watchlist, popular, upcoming");
            return Ok(ExitCode::FAILURE);
        }
    };

    if add.is_some() && !matches!(target, NavigationTarget::Movies(_)) {
        return Err(eyre!("--add only works with popular and upcoming"));
    }
    if page.is_some() && !matches!(target, NavigationTarget::Movies(_)) {
        return Err(eyre!("--page only works with popular and upcoming"));
    }

    let screen = ctx.navigator.open(target);
    let mut view = ScreenView::attach(&screen, output, &ctx.config.messages, ctx.image_base_url());

    screen.send(page.map(Intent::LoadPage).unwrap_or(Intent::Load))?;
    view.settle().await?;

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

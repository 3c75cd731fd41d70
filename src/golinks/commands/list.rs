use crate::bookmarks::Bookmarks;
use crate::commands::{CmdResult, ExecContext};
use crate::error::Result;
use crate::store::Store;

pub fn run<S: Store>(ctx: &ExecContext<'_, S>) -> Result<CmdResult> {
    let bookmarks = Bookmarks::new(ctx.store).list()?;
    let commands = ctx.registry.infos();
    Ok(CmdResult::default()
        .with_listed_bookmarks(bookmarks)
        .with_listed_commands(commands))
}

use crate::commands::{CmdMessage, CmdResult, ExecContext};
use crate::error::Result;
use crate::history::History;
use crate::store::Store;

pub fn run<S: Store>(ctx: &ExecContext<'_, S>) -> Result<CmdResult> {
    let entries = History::new(ctx.store, ctx.clock).list()?;
    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No history yet."));
    }
    Ok(result.with_listed_history(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Harness;

    #[test]
    fn empty_history_says_so() {
        let h = Harness::new();
        let res = run(&h.ctx()).unwrap();
        assert!(res.listed_history.is_empty());
        assert_eq!(res.messages.len(), 1);
    }

    #[test]
    fn lists_newest_first() {
        let h = Harness::new();
        let history = History::new(&h.store, &h.clock);
        history.append("gh", "rust").unwrap();
        history.append("wp", "ferris").unwrap();

        let res = run(&h.ctx()).unwrap();
        let what: Vec<_> = res.listed_history.iter().map(|e| e.what()).collect();
        assert_eq!(what, vec!["wp ferris", "gh rust"]);
        assert!(res.messages.is_empty());
    }
}

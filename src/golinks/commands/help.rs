use crate::commands::{CmdResult, ExecContext};
use crate::error::Result;
use crate::store::Store;

pub fn run<S: Store>(ctx: &ExecContext<'_, S>) -> Result<CmdResult> {
    let commands = ctx.registry.infos();
    Ok(CmdResult::default().with_listed_commands(commands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Harness;

    #[test]
    fn lists_every_builtin_sorted() {
        let h = Harness::new();
        let res = run(&h.ctx()).unwrap();
        let names: Vec<_> = res.listed_commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["bookmark", "help", "history", "list"]);
        assert!(res.redirect.is_none());
    }
}

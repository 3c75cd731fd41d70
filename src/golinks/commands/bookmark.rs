use crate::bookmarks::Bookmarks;
use crate::commands::{CmdMessage, CmdResult, ExecContext};
use crate::error::{GolinksError, Result};
use crate::model::Bookmark;
use crate::store::Store;

const USAGE: &str = "usage: bookmark add <name> <url> | bookmark remove <name> | bookmark list";

pub fn run<S: Store>(ctx: &ExecContext<'_, S>, args: &[String]) -> Result<CmdResult> {
    let bookmarks = Bookmarks::new(ctx.store);
    let args: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| !a.is_empty())
        .collect();

    match args.as_slice() {
        [] | ["list"] => Ok(CmdResult::default().with_listed_bookmarks(bookmarks.list()?)),
        ["add", name, url] => add(&bookmarks, name, url),
        ["remove", name] | ["rm", name] => remove(&bookmarks, name),
        _ => Err(GolinksError::Api(USAGE.to_string())),
    }
}

fn add<S: Store>(bookmarks: &Bookmarks<'_, S>, name: &str, url: &str) -> Result<CmdResult> {
    let replaced = bookmarks.get(name)?.is_some();
    let bookmark = Bookmark::new(name, url);
    bookmarks.put(&bookmark)?;

    let mut result = CmdResult::default().with_listed_bookmarks(vec![bookmark]);
    if replaced {
        result.add_message(CmdMessage::success(format!("Updated bookmark {}", name)));
    } else {
        result.add_message(CmdMessage::success(format!("Added bookmark {}", name)));
    }
    Ok(result)
}

fn remove<S: Store>(bookmarks: &Bookmarks<'_, S>, name: &str) -> Result<CmdResult> {
    match bookmarks.remove(name) {
        Ok(()) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!("Removed bookmark {}", name)));
            Ok(result)
        }
        Err(GolinksError::NotFound(_)) => {
            Err(GolinksError::Api(format!("no such bookmark: {}", name)))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{args, Harness};

    #[test]
    fn add_then_list() {
        let h = Harness::new();
        let res = run(&h.ctx(), &args(&["add", "gh", "https://github.com/search?q=%s"])).unwrap();
        assert_eq!(res.messages[0].content, "Added bookmark gh");

        let res = run(&h.ctx(), &args(&["list"])).unwrap();
        assert_eq!(
            res.listed_bookmarks,
            vec![Bookmark::new("gh", "https://github.com/search?q=%s")]
        );
    }

    #[test]
    fn add_existing_reports_update() {
        let h = Harness::new();
        run(&h.ctx(), &args(&["add", "gh", "https://old/%s"])).unwrap();
        let res = run(&h.ctx(), &args(&["add", "gh", "https://new/%s"])).unwrap();
        assert_eq!(res.messages[0].content, "Updated bookmark gh");
        assert_eq!(
            Bookmarks::new(&h.store).get("gh").unwrap().unwrap().url,
            "https://new/%s"
        );
    }

    #[test]
    fn no_args_lists() {
        let h = Harness::new();
        run(&h.ctx(), &args(&["add", "wp", "http://en.wikipedia.org/?search=%s"])).unwrap();
        let res = run(&h.ctx(), &[]).unwrap();
        assert_eq!(res.listed_bookmarks.len(), 1);
    }

    #[test]
    fn empty_segments_are_ignored() {
        // Path style input produces empty trailing segments.
        let h = Harness::new();
        let res = run(&h.ctx(), &args(&["add", "", "g", "https://google.com/?q=%s", ""])).unwrap();
        assert_eq!(res.listed_bookmarks[0].name, "g");
    }

    #[test]
    fn remove_existing_and_missing() {
        let h = Harness::new();
        run(&h.ctx(), &args(&["add", "g", "https://google.com/?q=%s"])).unwrap();
        let res = run(&h.ctx(), &args(&["remove", "g"])).unwrap();
        assert_eq!(res.messages[0].content, "Removed bookmark g");

        let err = run(&h.ctx(), &args(&["rm", "g"])).unwrap_err();
        assert!(err.to_string().contains("no such bookmark: g"));
    }

    #[test]
    fn malformed_args_fail() {
        let h = Harness::new();
        for bad in [&["add", "only-name"][..], &["frobnicate"][..], &["remove"][..]] {
            let err = run(&h.ctx(), &args(bad)).unwrap_err();
            assert!(err.to_string().contains("usage"), "{:?}", bad);
        }
    }
}

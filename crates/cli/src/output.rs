//! Terminal output.
//!
//! Rendered views and success notices go to stdout; error notices go to
//! stderr so scripted callers can separate them.

use std::fmt::Display;
use std::io::{self, Write};

use choco_shop_storefront::views::{Notice, NoticeKind};

/// Write a rendered view to stdout.
pub fn emit(text: impl Display) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", text.to_string().trim_end())
}

/// Write a notice, choosing the stream by its kind.
pub fn notify(notice: &Notice) -> io::Result<()> {
    match notice.kind {
        NoticeKind::Success => {
            let mut out = io::stdout().lock();
            writeln!(out, "✔ {notice}")
        }
        NoticeKind::Error => notify_error(&notice.message),
    }
}

fn notify_error(message: &str) -> io::Result<()> {
    let mut err = io::stderr().lock();
    writeln!(err, "✘ {message}")
}

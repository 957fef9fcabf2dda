//! Rendering of simulated terminal sessions.
//!
//! Every page body on the site is a fake shell transcript: a `pwd`, an
//! `ls -al`, sometimes a `cat`, and a trailing prompt with a blinking
//! cursor. The illusion only holds if the output is indistinguishable from
//! a real terminal, so the format here is deliberately rigid:
//!
//! ```text
//! drwxr-xr-x  2 guest guest 4096 Mar 12 14:23 .
//! -rw-r--r--  2 guest guest   812 Aug  3 17:45 <a href="?cat=notes.md" ...>notes.md</a>
//! lrwxrwxrwx  1 guest guest    23 Feb 28 12:00 github -> <a ...>https://github.com/acme</a>
//! ```
//!
//! Column conventions, matching coreutils `ls` closely enough to fool a
//! careful reader:
//!
//! | column | directories | files | symlinks |
//! |--------|-------------|-------|----------|
//! | mode   | `drwxr-xr-x` | `-rw-r--r--` | `lrwxrwxrwx` |
//! | links  | 2 | 2 | 1 |
//! | size   | `4096`, unpadded | bytes, right-aligned to 5 | target length, right-aligned to 5 |
//! | date   | `Mon DD HH:MM`, day space-padded, time zero-padded | same | same |
//!
//! The functions here are pure: same inputs, same bytes, no clock and no
//! filesystem. Callers decide what the entries are and what the timestamps
//! say; placeholder rows like `.` and `..` carry fixed date strings so that
//! rebuilding a site never churns its pages.
//!
//! The same transcript shapes are produced at runtime by the generated
//! client script (see `catview`), which receives these class names and the
//! not-found template verbatim. Change a constant here and the client picks
//! it up on the next build.

use chrono::{DateTime, Datelike, Local, Timelike};

pub(crate) const BLOCK_CLASS: &str = "home-terminal";
pub(crate) const SESSION_CLASS: &str = "home-terminal-session";
pub(crate) const BANNER_CLASS: &str = "home-terminal-banner";
pub(crate) const PROMPT_CLASS: &str = "home-terminal-prompt";
pub(crate) const CURSOR_CLASS: &str = "home-terminal-cursor";
pub(crate) const FILE_LINK_CLASS: &str = "home-terminal-file-link";

/// Error line for a name that cannot be resolved. `{name}` is substituted
/// with the HTML-escaped file name.
pub(crate) const NOT_FOUND_TEMPLATE: &str =
    "ls: cannot access '{name}': No such file or directory";

pub(crate) const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One row of an `ls -al` listing.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub date: EntryDate,
    /// When set, the name cell becomes a link to this target.
    pub href: Option<String>,
}

#[derive(Debug, Clone)]
pub enum EntryKind {
    Dir,
    File,
    /// Rendered as `name -> target`, with the target itself being the link.
    Symlink { target: String },
}

/// Timestamp shown in the date column.
#[derive(Debug, Clone)]
pub enum EntryDate {
    /// A real modification time, formatted on render.
    Stamp(DateTime<Local>),
    /// A pre-formatted string, used verbatim. Keeps synthetic rows stable
    /// across rebuilds.
    Fixed(String),
}

impl EntryDate {
    pub fn fixed(s: impl Into<String>) -> Self {
        EntryDate::Fixed(s.into())
    }

    fn render(&self) -> String {
        match self {
            EntryDate::Stamp(t) => format_ls_date(t),
            EntryDate::Fixed(s) => s.clone(),
        }
    }
}

impl Entry {
    pub fn dir(name: impl Into<String>, date: EntryDate) -> Self {
        Entry {
            name: name.into(),
            kind: EntryKind::Dir,
            size: 0,
            date,
            href: None,
        }
    }

    pub fn file(name: impl Into<String>, size: u64, date: EntryDate) -> Self {
        Entry {
            name: name.into(),
            kind: EntryKind::File,
            size,
            date,
            href: None,
        }
    }

    /// A symlink row. The size column shows the length of the target string,
    /// which is what a real symlink's size would be.
    pub fn symlink(name: impl Into<String>, target: impl Into<String>, date: EntryDate) -> Self {
        let target = target.into();
        Entry {
            name: name.into(),
            kind: EntryKind::Symlink {
                target: target.clone(),
            },
            size: target.len() as u64,
            date,
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// Shell prompt for a directory segment: `guest@web:~$ ` at the root,
/// `guest@web:~/blog$ ` inside a section.
pub fn prompt_for(user: &str, host: &str, dir: &str) -> String {
    if dir.is_empty() {
        format!("{user}@{host}:~$ ")
    } else {
        format!("{user}@{host}:~/{dir}$ ")
    }
}

/// What `pwd` prints for a directory segment.
pub fn working_dir(user: &str, dir: &str) -> String {
    if dir.is_empty() {
        format!("/home/{user}")
    } else {
        format!("/home/{user}/{dir}")
    }
}

/// `Mon DD HH:MM` with the day padded to two columns with a space and the
/// time zero-padded, e.g. `Jan  8 09:41`.
pub fn format_ls_date<T: Datelike + Timelike>(t: &T) -> String {
    format!(
        "{} {:>2} {:02}:{:02}",
        MONTHS[t.month0() as usize],
        t.day(),
        t.hour(),
        t.minute()
    )
}

/// A full `pwd` + `ls -al` transcript. The `total` count is the number of
/// entries in the listing, placeholder rows included.
pub fn render_listing(prompt: &str, pwd: &str, user: &str, entries: &[Entry]) -> String {
    let p = prompt_span(prompt);
    let rows: Vec<String> = entries.iter().map(|e| ls_row(e, user)).collect();
    session_block(&format!(
        "{p}pwd\n{pwd}\n{p}ls -al\ntotal {total}\n{rows}\n{p}{cursor}",
        pwd = escape_html(pwd),
        total = entries.len(),
        rows = rows.join("\n"),
        cursor = cursor_span(),
    ))
}

/// The transcript shown when a single file is opened: `ls -al <name>`
/// with its one row, then `cat <name>` with the body text.
pub fn render_cat(prompt: &str, user: &str, file: &Entry, body: &str) -> String {
    let p = prompt_span(prompt);
    let name = escape_html(&file.name);
    session_block(&format!(
        "{p}ls -al {name}\n{row}\n{p}cat {name}\n{body}\n{p}{cursor}",
        row = ls_row(file, user),
        body = escape_html(body),
        cursor = cursor_span(),
    ))
}

/// The transcript for a name that does not resolve to anything.
pub fn render_missing(prompt: &str, name: &str) -> String {
    let p = prompt_span(prompt);
    let name = escape_html(name);
    session_block(&format!(
        "{p}ls -al {name}\n{error}\n{p}{cursor}",
        error = NOT_FOUND_TEMPLATE.replace("{name}", &name),
        cursor = cursor_span(),
    ))
}

/// The login banner block shown above the home listing.
pub fn render_banner(lines: &[String]) -> String {
    let text: Vec<String> = lines.iter().map(|l| escape_html(l)).collect();
    format!(
        "<div class=\"{BLOCK_CLASS}\">\n<pre class=\"{BANNER_CLASS}\">{}</pre>\n</div>",
        text.join("\n")
    )
}

fn ls_row(entry: &Entry, user: &str) -> String {
    let perm = match entry.kind {
        EntryKind::Dir => "drwxr-xr-x",
        EntryKind::File => "-rw-r--r--",
        EntryKind::Symlink { .. } => "lrwxrwxrwx",
    };
    let nlink = match entry.kind {
        EntryKind::Symlink { .. } => 1,
        _ => 2,
    };
    let size = match entry.kind {
        EntryKind::Dir => "4096".to_string(),
        _ => format!("{:>5}", entry.size),
    };
    let name = match (&entry.kind, &entry.href) {
        (EntryKind::Symlink { target }, _) => format!(
            "{} -> <a href=\"{}\" class=\"{FILE_LINK_CLASS}\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(&entry.name),
            escape_html(target),
            escape_html(target),
        ),
        (_, Some(href)) => format!(
            "<a href=\"{}\" class=\"{FILE_LINK_CLASS}\">{}</a>",
            escape_html(href),
            escape_html(&entry.name),
        ),
        (_, None) => escape_html(&entry.name),
    };
    format!(
        "{perm}  {nlink} {user} {user} {size} {date} {name}",
        date = entry.date.render()
    )
}

fn session_block(lines: &str) -> String {
    format!("<div class=\"{BLOCK_CLASS}\">\n<pre class=\"{SESSION_CLASS}\">{lines}</pre>\n</div>")
}

fn prompt_span(prompt: &str) -> String {
    format!(
        "<span class=\"{PROMPT_CLASS}\">{}</span>",
        escape_html(prompt)
    )
}

fn cursor_span() -> String {
    format!("<span class=\"{CURSOR_CLASS}\"></span>")
}

/// Escapes `&`, `<`, `>` and `"`. Apostrophes pass through; nothing on the
/// site emits user text into single-quoted attributes.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

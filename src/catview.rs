//! The cat view: rendering one content file as a terminal transcript.
//!
//! Section pages link their files as `?cat=<name>` instead of one page
//! per file. When a visitor follows such a link, script in the page
//! fetches the raw file and swaps in a `ls -al` + `cat` transcript, so
//! the site ships one HTML page per section no matter how many files
//! the section holds.
//!
//! That means the transcript format exists in two runtimes: this module
//! renders it in Rust (for the `cat` CLI command and for tests), and the
//! generated `js/main.js` renders it in the browser. The two are kept
//! identical by construction rather than by discipline: the client
//! script is built from a template into which [`client_script`] injects
//! a JSON contract carrying the shared constants — user, host, month
//! names, the not-found line, the CSS class names. The byte-level format
//! itself lives in [`crate::terminal`]; this module only decides *what*
//! to render.
//!
//! Resolution order is deliberate: the whitelist check happens before
//! any fetch. An unlisted name renders the not-found block even if a
//! file by that name happens to exist. The whitelist is the set of
//! filenames the build actually published, and nothing else is
//! reachable through the query parameter.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::frontmatter;
use crate::terminal::{self, Entry, EntryDate};

/// Query parameter naming the file to render.
pub const QUERY_PARAM: &str = "cat";

const CLIENT_JS_TEMPLATE: &str = include_str!("../static/main.js");
const CONTRACT_TOKEN: &str = "__TERMSITE_CONTRACT__";

/// Raw content handed back by a [`ContentSource`].
pub struct FetchedFile {
    pub text: String,
    /// Size in bytes of the raw file.
    pub size: u64,
    /// Modification time when the source knows it. The client-side
    /// resolver never does and substitutes the current time.
    pub modified: Option<DateTime<Local>>,
}

/// Where file contents come from. The build and CLI read the content
/// directory; the browser fetches over HTTP; tests use an in-memory map.
pub trait ContentSource {
    /// `None` on any failure: missing file, unreadable file, bad UTF-8.
    fn fetch(&self, name: &str) -> Option<FetchedFile>;
}

/// Reads files from one section's content directory.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSource { dir: dir.into() }
    }
}

impl ContentSource for DirSource {
    fn fetch(&self, name: &str) -> Option<FetchedFile> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return None;
        }
        let stat = fs::metadata(&path).ok()?;
        let text = fs::read_to_string(&path).ok()?;
        Some(FetchedFile {
            text,
            size: stat.len(),
            modified: stat.modified().ok().map(DateTime::<Local>::from),
        })
    }
}

/// A resolved cat view.
pub struct CatView {
    pub html: String,
    /// `title` from the file's front matter, when present.
    pub title: Option<String>,
}

/// Renders the transcript for one requested filename.
///
/// `raw_name` is the query parameter value as it appeared in the URL;
/// it is percent-decoded (with `+` as space) before lookup. Resolution
/// never fails: unknown, unlisted and unreadable names all produce the
/// not-found block.
pub fn resolve(
    raw_name: &str,
    whitelist: &[String],
    prompt: &str,
    user: &str,
    source: &dyn ContentSource,
) -> CatView {
    let name = decode_query_value(raw_name);

    if name.is_empty() || !whitelist.iter().any(|w| *w == name) {
        return CatView {
            html: terminal::render_missing(prompt, &name),
            title: None,
        };
    }

    let Some(fetched) = source.fetch(&name) else {
        return CatView {
            html: terminal::render_missing(prompt, &name),
            title: None,
        };
    };

    let (meta, body) = frontmatter::parse(&fetched.text);
    let date = EntryDate::Stamp(fetched.modified.unwrap_or_else(Local::now));
    let entry = Entry::file(&name, fetched.size, date);

    CatView {
        html: terminal::render_cat(prompt, user, &entry, body),
        title: meta.get("title").cloned(),
    }
}

/// Percent-decodes a query value, treating `+` as a space. Undecodable
/// input is used as-is; it will fail the whitelist check and render as
/// not found under its raw name.
fn decode_query_value(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => plus_decoded,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientContract<'a> {
    user: &'a str,
    host: &'a str,
    param: &'a str,
    months: [&'static str; 12],
    not_found: &'a str,
    classes: ClientClasses<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientClasses<'a> {
    block: &'a str,
    session: &'a str,
    prompt: &'a str,
    cursor: &'a str,
    link: &'a str,
}

/// The browser-side resolver script with the rendering contract baked
/// in. Written to `js/main.js` on every build.
pub fn client_script(config: &SiteConfig) -> String {
    let contract = ClientContract {
        user: &config.user,
        host: &config.host,
        param: QUERY_PARAM,
        months: terminal::MONTHS,
        not_found: terminal::NOT_FOUND_TEMPLATE,
        classes: ClientClasses {
            block: terminal::BLOCK_CLASS,
            session: terminal::SESSION_CLASS,
            prompt: terminal::PROMPT_CLASS,
            cursor: terminal::CURSOR_CLASS,
            link: terminal::FILE_LINK_CLASS,
        },
    };
    let json = serde_json::to_string(&contract).expect("client contract must serialize");
    CLIENT_JS_TEMPLATE.replace(CONTRACT_TOKEN, &json)
}

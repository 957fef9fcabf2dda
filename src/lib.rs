//! # Termsite
//!
//! A static site generator whose pages look like a terminal session. The
//! home page is a login banner plus an `ls -al` of your site's sections,
//! every section page is a directory listing of its files, and opening a
//! file replays `cat` output — either baked in at build time or rendered
//! in the browser from a `?cat=` query parameter.
//!
//! # Architecture: One-Pass Build
//!
//! A build is a single pass over two declarative inputs:
//!
//! ```text
//! 1. Registry   content/sections.json  →  ordered, grouped sections
//! 2. Scan       content/ + downloads   →  files, metadata, cat whitelist
//! 3. Render     terminal + page        →  dist/ (pages, copies, assets)
//! ```
//!
//! There is no cache and no incremental mode: the output directory is
//! destroyed and rebuilt every time. Sites this renders are small enough
//! that a full rebuild is faster than any bookkeeping that could avoid one.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | `sections.json` loading, stable ordering, invariant validation |
//! | [`config`] | `site.toml` identity and flavor: user/host, banner, contact links, placeholder dates |
//! | [`frontmatter`] | `---` key/value header extraction — infallible, malformed input degrades to plain body |
//! | [`scan`] | One read-only pass over section content and download artifacts, whitelist accumulation |
//! | [`terminal`] | The `pwd` / `ls -al` / `cat` transcript renderer — pure functions, byte-stable output |
//! | [`page`] | Page shell: layout token substitution, navigation, breadcrumbs, relative base paths |
//! | [`build`] | Orchestrator: output reset, skeleton, assets, pages, verbatim content copies |
//! | [`catview`] | The `?cat=` resolver: shared rendering contract plus the generated client script |
//! | [`output`] | CLI output formatting for the check and build stages |
//!
//! # Design Decisions
//!
//! ## One Rendering Contract, Two Runtimes
//!
//! The cat view must render byte-identically whether the batch build
//! produced it or the browser did. Rather than maintaining two sets of
//! format strings and letting them drift, the Rust renderer's constants —
//! user, host, CSS class names, the month table, the not-found line — are
//! serialized to JSON and injected into the generated `js/main.js` at
//! build time. The client script is written on every build and never
//! shipped by hand, so the two runtimes cannot disagree for long.
//!
//! ## Maud for Fragments, Tokens for the Shell
//!
//! Navigation and breadcrumbs are rendered with
//! [Maud](https://maud.lambda.xyz/): compile-time checked, auto-escaped,
//! no stringly-typed lookups. The outer page shell stays a plain
//! `layout.html` with `{{token}}` slots, because site owners edit that
//! file and should not need a Rust toolchain to move a footer.
//!
//! ## Placeholder Dates for Synthetic Rows
//!
//! Listing rows that have no real file behind them (`.`, `..`, the home
//! page's section directories, contact symlinks) carry fixed date strings
//! from `site.toml` instead of the build clock. Listings therefore never
//! churn just because the site was rebuilt; only real content changes
//! move real mtimes.
//!
//! ## Whitelist Before Fetch
//!
//! The client resolver takes a filename from the URL. It checks that name
//! against the build-time whitelist embedded in the page before issuing
//! any request, so a crafted `?cat=` value cannot probe the server for
//! paths the build did not publish. Unknown names render the same
//! `ls: cannot access` transcript a missing file would.

pub mod build;
pub mod catview;
pub mod config;
pub mod frontmatter;
pub mod output;
pub mod page;
pub mod registry;
pub mod scan;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Page composition: layout substitution, navigation, breadcrumbs.
//!
//! A page is assembled from a shared layout template with `{{...}}`
//! placeholder tokens. Triple-brace tokens receive pre-rendered HTML,
//! double-brace tokens receive plain strings:
//!
//! | token | value |
//! |-------|-------|
//! | `{{title}}` | page title, falling back to the site title |
//! | `{{base}}` | relative prefix to the site root (`""`, `"../"`, ...) |
//! | `{{lastRefreshed}}` | UTC build timestamp |
//! | `{{{body}}}` | page body fragment |
//! | `{{{breadcrumb}}}` | breadcrumb trail, possibly empty |
//! | `{{version}}` | deployed site version, possibly empty |
//! | `{{mainClass}}` | modifier class on the `<main>` element |
//! | `{{{nav}}}` | sidebar navigation links |
//! | `{{{catWhitelist}}}` | JSON array of fetchable content filenames |
//!
//! Pages are written at varying depths, so every root-relative reference
//! goes through `{{base}}`. Bodies get the same treatment: `src`/`href`
//! attributes pointing into `images/` are rewritten against the page's
//! base so one body fragment works from any depth.

use maud::{html, Markup};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SiteConfig;
use crate::registry::{MAIN_GROUP, Registry, SectionDescriptor};

/// Modifier class for pages whose main content is a terminal block.
pub const TERMINAL_MAIN_CLASS: &str = "main--home-terminal";

/// Everything a page needs from the build besides its own content.
pub struct PageContext<'a> {
    pub registry: &'a Registry,
    pub site: &'a SiteConfig,
    /// Deployed version string, empty when unknown.
    pub version: &'a str,
    /// UTC timestamp of this build.
    pub last_refreshed: &'a str,
    /// JSON array of whitelisted `?cat=` filenames.
    pub whitelist_json: &'a str,
}

/// One page to be emitted.
pub struct PageDescriptor {
    /// Output file path relative to the output root, e.g. `blog/index.html`.
    pub output_path: String,
    pub title: String,
    /// Section id that gets the active marker in navigation.
    pub active_section_id: String,
    pub body_html: String,
    pub main_class: String,
}

impl PageDescriptor {
    /// A standard terminal-styled page.
    pub fn terminal(
        output_path: impl Into<String>,
        title: impl Into<String>,
        active_section_id: impl Into<String>,
        body_html: String,
    ) -> Self {
        PageDescriptor {
            output_path: output_path.into(),
            title: title.into(),
            active_section_id: active_section_id.into(),
            body_html,
            main_class: TERMINAL_MAIN_CLASS.to_string(),
        }
    }
}

/// Substitute a page into the layout template.
pub fn compose(layout: &str, ctx: &PageContext, page: &PageDescriptor) -> String {
    let base = base_for(&page.output_path);
    let title = if page.title.is_empty() {
        ctx.site.title.as_str()
    } else {
        page.title.as_str()
    };
    let body = rewrite_image_paths(&page.body_html, &base);
    let breadcrumb = render_breadcrumb(&page.output_path, &ctx.site.user, &ctx.site.host);
    let nav = render_nav(ctx.registry.sections(), &page.active_section_id, &base);

    layout
        .replace("{{title}}", title)
        .replace("{{base}}", &base)
        .replace("{{lastRefreshed}}", ctx.last_refreshed)
        .replace("{{{body}}}", &body)
        .replace("{{{breadcrumb}}}", &breadcrumb.into_string())
        .replace("{{version}}", ctx.version)
        .replace("{{mainClass}}", &page.main_class)
        .replace("{{{nav}}}", &nav.into_string())
        .replace("{{{catWhitelist}}}", ctx.whitelist_json)
}

/// Relative prefix from a page back to the site root: one `../` per path
/// segment beyond the first. `blog/index.html` sits one level deep and
/// gets `../`; the root `index.html` gets nothing.
pub fn base_for(output_path: &str) -> String {
    let segments = output_path.split('/').filter(|s| !s.is_empty()).count();
    if segments <= 1 {
        String::new()
    } else {
        "../".repeat(segments - 1)
    }
}

/// Sidebar navigation. Sections are bucketed by `navGroup` in first-seen
/// order, so a group's sections render together even when the registry
/// interleaves them. Every group except "Main" gets a header.
pub fn render_nav(sections: &[SectionDescriptor], active_id: &str, base: &str) -> Markup {
    let mut groups: Vec<(&str, Vec<&SectionDescriptor>)> = Vec::new();
    for section in sections {
        match groups.iter_mut().find(|(g, _)| *g == section.nav_group) {
            Some((_, members)) => members.push(section),
            None => groups.push((section.nav_group.as_str(), vec![section])),
        }
    }

    html! {
        @for (group, members) in &groups {
            @if *group != MAIN_GROUP {
                div.nav-section { (group) }
            }
            @for section in members {
                a.nav-link.active[section.id == active_id] href=(nav_href(section, base)) {
                    (section.label)
                }
            }
        }
    }
}

fn nav_href(section: &SectionDescriptor, base: &str) -> String {
    if section.output_path.is_empty() {
        format!("{base}index.html")
    } else {
        format!("{base}{}/index.html", section.output_path)
    }
}

/// Breadcrumb trail styled as a shell prompt: `guest@web:~ / blog $`.
///
/// The root page shows a bare `~`. A section index shows the section
/// segment unlinked. Deeper pages link the section segment back to its
/// index and show the page's own directory unlinked. An output path with
/// no segments yields no markup at all.
pub fn render_breadcrumb(output_path: &str, user: &str, host: &str) -> Markup {
    let segments: Vec<&str> = output_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return html! {};
    }

    let prompt = format!("{user}@{host}:~");

    // Root index.html: just the home prompt.
    if segments.len() == 1 {
        return html! {
            nav.breadcrumb.breadcrumb-cli aria-label="Breadcrumb" {
                span.breadcrumb-prompt { (prompt) }
                span.breadcrumb-prompt { "$" }
            }
        };
    }

    let section = segments[0];
    let deeper = segments.len() > 2;
    // From the page's directory back up to the section index.
    let ups = "../".repeat(segments.len() - 2);

    html! {
        nav.breadcrumb.breadcrumb-cli aria-label="Breadcrumb" {
            span.breadcrumb-prompt { (prompt) }
            span.breadcrumb-sep { "/" }
            @if deeper {
                a.breadcrumb-link href=(format!("{ups}index.html")) { (section) }
                span.breadcrumb-sep { "/" }
                span.breadcrumb-current { (segments[segments.len() - 2]) }
            } @else {
                span.breadcrumb-current { (section) }
            }
            span.breadcrumb-prompt { "$" }
        }
    }
}

static IMAGES_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(src|href)="images/"#).expect("images regex must compile"));

/// Rewrites root-relative `images/` references against the page's base.
pub fn rewrite_image_paths(body: &str, base: &str) -> String {
    IMAGES_ATTR
        .replace_all(body, format!(r#"${{1}}="{base}images/"#).as_str())
        .into_owned()
}

//! End-to-end builds over real temp project trees.
//!
//! Each test lays out a complete site project (registry, content, optional
//! assets and templates), runs a full build through the public API, and
//! asserts on the written pages.
//!
//! Run with: cargo test --test build

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use termsite::build::{Project, build};
use termsite::catview::{self, DirSource};
use termsite::config::SiteConfig;

const BASIC_REGISTRY: &str = r#"{
  "sections": [
    { "id": "home", "label": "Home", "order": 0 },
    { "id": "blog", "label": "Blog", "order": 1, "contentDir": "blog", "outputPath": "blog" },
    { "id": "downloads", "label": "Downloads", "order": 2, "outputPath": "downloads" },
    { "id": "contact", "label": "Contact", "order": 3, "outputPath": "contact" }
  ]
}"#;

// "---\ntitle: Notes\n---\nhello\n" is 27 bytes on disk; the listing row
// must show the raw size, front matter included.
const NOTES_MD: &str = "---\ntitle: Notes\n---\nhello\n";

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn project(tmp: &TempDir) -> Project {
    Project::new(
        tmp.path(),
        tmp.path().join("content"),
        tmp.path().join("dist"),
    )
}

fn basic_project(tmp: &TempDir) -> Project {
    let p = project(tmp);
    write(&p.content_dir.join("sections.json"), BASIC_REGISTRY);
    write(&p.content_dir.join("blog/notes.md"), NOTES_MD);
    write(&p.content_dir.join("downloads/resume.pdf"), "%PDF-1.4 stub\n");
    p
}

fn read_page(project: &Project, path: &str) -> String {
    fs::read_to_string(project.output_dir.join(path)).unwrap()
}

#[test]
fn blog_listing_matches_the_terminal_contract() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);

    build(&p, &SiteConfig::default()).unwrap();

    let page = read_page(&p, "blog/index.html");
    assert!(page.contains("total 3"));
    assert!(page.contains(r#"<span class="home-terminal-prompt">guest@web:~/blog$ </span>"#));
    assert!(page.contains("/home/guest/blog"));
    assert!(
        page.contains(
            r#"<a href="?cat=notes.md" class="home-terminal-file-link">notes.md</a>"#
        )
    );
    assert!(page.contains("-rw-r--r--  2 guest guest    27 "));
    // Exactly `.`, `..` and the one file.
    assert_eq!(page.matches("drwxr-xr-x").count(), 2);
    assert_eq!(page.matches("-rw-r--r--").count(), 1);
}

#[test]
fn home_page_lists_sections_under_the_banner() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);

    build(&p, &SiteConfig::default()).unwrap();

    let page = read_page(&p, "index.html");
    assert!(page.starts_with("<!DOCTYPE html>"));
    let banner = page.find("home-terminal-banner").unwrap();
    let session = page.find("home-terminal-session").unwrap();
    assert!(banner < session);
    // ., .. and blog, downloads, contact.
    assert!(page.contains("total 5"));
    assert!(page.contains(r#"<a href="blog/index.html" class="home-terminal-file-link">blog</a>"#));
    assert!(page.contains("Last login:"));
    // Every template token must be substituted away.
    assert!(!page.contains("{{"));
}

#[test]
fn content_files_are_published_next_to_their_page() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);

    build(&p, &SiteConfig::default()).unwrap();

    assert_eq!(
        fs::read_to_string(p.output_dir.join("blog/notes.md")).unwrap(),
        NOTES_MD
    );
    assert!(p.output_dir.join("downloads/files/resume.pdf").is_file());
    let downloads = read_page(&p, "downloads/index.html");
    assert!(downloads.contains(r#"href="files/resume.pdf""#));
    assert!(!downloads.contains("?cat="));
}

#[test]
fn nested_pages_reach_assets_through_the_base_prefix() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);

    build(&p, &SiteConfig::default()).unwrap();

    let home = read_page(&p, "index.html");
    let blog = read_page(&p, "blog/index.html");
    assert!(home.contains(r#"href="css/style.css""#));
    assert!(home.contains(r#"src="js/main.js""#));
    assert!(blog.contains(r#"href="../css/style.css""#));
    assert!(blog.contains(r#"src="../js/main.js""#));
}

#[test]
fn breadcrumbs_render_the_prompt_trail() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);

    build(&p, &SiteConfig::default()).unwrap();

    let home = read_page(&p, "index.html");
    assert!(home.contains(
        r#"<nav class="breadcrumb breadcrumb-cli" aria-label="Breadcrumb"><span class="breadcrumb-prompt">guest@web:~</span><span class="breadcrumb-prompt">$</span></nav>"#
    ));

    let blog = read_page(&p, "blog/index.html");
    assert!(blog.contains(r#"<span class="breadcrumb-current">blog</span>"#));
}

#[test]
fn nav_groups_get_one_header_in_first_seen_order() {
    let tmp = TempDir::new().unwrap();
    let p = project(&tmp);
    write(
        &p.content_dir.join("sections.json"),
        r#"{
  "sections": [
    { "id": "home", "label": "Home", "order": 0 },
    { "id": "scanner", "label": "Scanner", "order": 1, "navGroup": "Tools", "contentDir": "scanner", "outputPath": "scanner" },
    { "id": "blog", "label": "Blog", "order": 2, "contentDir": "blog", "outputPath": "blog" },
    { "id": "differ", "label": "Differ", "order": 3, "navGroup": "Tools", "contentDir": "differ", "outputPath": "differ" }
  ]
}"#,
    );
    write(&p.content_dir.join("blog/a.md"), "body\n");

    build(&p, &SiteConfig::default()).unwrap();

    let page = read_page(&p, "index.html");
    assert_eq!(page.matches(r#"<div class="nav-section">"#).count(), 1);
    assert!(page.contains(r#"<div class="nav-section">Tools</div>"#));
    assert!(!page.contains(r#"<div class="nav-section">Main</div>"#));
    // Both Tools sections sit after the single header.
    let header = page.find(r#"<div class="nav-section">Tools</div>"#).unwrap();
    assert!(page.find(">Scanner<").unwrap() > header);
    assert!(page.find(">Differ<").unwrap() > header);
}

#[test]
fn sections_without_a_content_directory_get_no_page() {
    let tmp = TempDir::new().unwrap();
    let p = project(&tmp);
    write(
        &p.content_dir.join("sections.json"),
        r#"{
  "sections": [
    { "id": "home", "label": "Home" },
    { "id": "blog", "label": "Blog", "contentDir": "blog", "outputPath": "blog" },
    { "id": "drafts", "label": "Drafts", "contentDir": "drafts", "outputPath": "drafts" }
  ]
}"#,
    );
    // blog/ exists but is empty; drafts/ does not exist at all.
    fs::create_dir_all(p.content_dir.join("blog")).unwrap();

    build(&p, &SiteConfig::default()).unwrap();

    let blog = read_page(&p, "blog/index.html");
    assert!(blog.contains("total 2"));
    assert!(!p.output_dir.join("drafts/index.html").exists());
}

#[test]
fn cat_view_resolves_against_the_published_tree() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);

    build(&p, &SiteConfig::default()).unwrap();

    // The browser fetches relative to the page, i.e. from dist/blog/.
    let source = DirSource::new(p.output_dir.join("blog"));
    let whitelist = vec!["notes.md".to_string()];

    let view = catview::resolve("notes.md", &whitelist, "guest@web:~/blog$ ", "guest", &source);
    assert_eq!(view.title.as_deref(), Some("Notes"));
    assert!(view.html.contains("cat notes.md"));
    assert!(view.html.contains("hello"));
    assert!(view.html.contains("   27 "));

    let missing =
        catview::resolve("missing.md", &whitelist, "guest@web:~/blog$ ", "guest", &source);
    assert!(
        missing
            .html
            .contains("ls: cannot access 'missing.md': No such file or directory")
    );
}

#[test]
fn site_identity_flows_from_config() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);
    let mut config = SiteConfig::default();
    config.user = "mira".to_string();
    config.host = "vault".to_string();

    build(&p, &config).unwrap();

    let page = read_page(&p, "blog/index.html");
    assert!(page.contains("mira@vault:~/blog$ "));
    assert!(page.contains("-rw-r--r--  2 mira mira    27 "));
    assert!(page.contains("/home/mira/blog"));
}

#[test]
fn version_flows_from_deployment_json() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);
    write(
        &tmp.path().join("deployment.json"),
        r#"{ "version": "v9.1", "deployedAt": "2023-07-07" }"#,
    );

    build(&p, &SiteConfig::default()).unwrap();

    let page = read_page(&p, "index.html");
    assert!(page.contains(r#"<span class="site-version">v9.1</span>"#));
}

#[test]
fn custom_layout_replaces_the_embedded_default() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);
    write(
        &tmp.path().join("templates/layout.html"),
        "<title>{{title}}</title>\n{{{body}}}\n<script>var catWhitelist = {{{catWhitelist}}};</script>\n",
    );

    build(&p, &SiteConfig::default()).unwrap();

    let page = read_page(&p, "blog/index.html");
    assert!(page.starts_with("<title>Blog</title>"));
    assert!(!page.contains("sidebar"));
    assert!(page.contains(r#"var catWhitelist = ["notes.md"];"#));
}

#[test]
fn generated_client_script_carries_the_site_contract() {
    let tmp = TempDir::new().unwrap();
    let p = basic_project(&tmp);
    let mut config = SiteConfig::default();
    config.user = "mira".to_string();

    build(&p, &config).unwrap();

    let js = fs::read_to_string(p.output_dir.join("js/main.js")).unwrap();
    assert!(js.contains(r#""user":"mira""#));
    assert!(js.contains(r#""param":"cat""#));
    assert!(js.contains(r#""notFound":"ls: cannot access '{name}': No such file or directory""#));
    assert!(!js.contains("__TERMSITE_CONTRACT__"));
}

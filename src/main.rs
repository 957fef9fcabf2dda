use clap::{Parser, Subcommand};
use std::path::PathBuf;
use termsite::{build, catview, config, output, registry, scan, terminal};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "termsite")]
#[command(about = "Static site generator styled as a terminal session")]
#[command(long_about = "\
Static site generator styled as a terminal session

Pages are fake shell transcripts: the home page shows a login banner and an
`ls -al` of your sections, each section page lists its files, and opening a
file renders `cat` output in place through the ?cat= query parameter.

Project structure:

  site.toml                    # Identity and flavor (optional)
  deployment.json              # { \"version\": ... } from deploy (optional)
  templates/
  └── layout.html              # Page shell (optional, embedded default)
  assets/
  ├── css/                     # Copied to dist/css; a style.css here
  │                            #   replaces the embedded default
  ├── js/                      # Copied to dist/js; main.js is always
  │                            #   regenerated, do not ship one
  ├── fonts/
  └── images/
  content/
  ├── sections.json            # Section registry (required)
  ├── blog/                    # A section's contentDir: .md files with
  │   └── hello.md             #   front matter, listed and cat-able
  └── downloads/               # Real artifacts, linked directly

Run 'termsite gen-config' to print a documented site.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root holding site.toml, templates/ and assets/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site: registry → scan → pages
    Build,
    /// Validate registry and content without writing anything
    Check,
    /// Print the cat view of one content file, as the browser would render it
    Cat {
        /// Section id whose content directory holds the file
        section: String,
        /// Filename as it appears in the section listing
        file: String,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let project = build::Project::new(&cli.root, &cli.source, &cli.output);

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.root)?;
            println!("==> Building {}", cli.source.display());
            let report = build::build(&project, &config)?;
            output::print_build_output(&report);
            println!("==> Site written to {}", cli.output.display());
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.source.display());
            let registry = registry::Registry::load(&project.registry_path())?;
            let content = scan::scan(&cli.source, &registry, &config)?;
            output::print_check_output(&registry, &content, &config);
            println!("==> Content is valid");
        }
        Command::Cat { section, file } => {
            let config = config::load_config(&cli.root)?;
            let registry = registry::Registry::load(&project.registry_path())?;
            let content = scan::scan(&cli.source, &registry, &config)?;

            let Some(descriptor) = registry.get(&section) else {
                return Err(format!("unknown section '{section}'").into());
            };
            let Some(dir_name) = &descriptor.content_dir else {
                return Err(format!("section '{section}' has no content directory").into());
            };

            // Same prompt the client derives from the page URL: the last
            // segment of the section's path.
            let segment = descriptor.output_path.rsplit('/').next().unwrap_or("");
            let prompt = terminal::prompt_for(&config.user, &config.host, segment);
            let source = catview::DirSource::new(cli.source.join(dir_name));
            let view =
                catview::resolve(&file, &content.cat_whitelist, &prompt, &config.user, &source);
            println!("{}", view.html);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

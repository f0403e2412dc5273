use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::commands::Sources;
use crate::config::{CONFIG_FILE, Config};
use crate::loader;

/// Exit codes shared by the markdown and JSON outputs.
const EXIT_CODES: [(u8, &str); 4] = [
    (0, "Success"),
    (1, "Token fell back to home"),
    (2, "Token or reference rejected, or no neighbouring chapter"),
    (3, "Runtime error"),
];

// ── State ─────────────────────────────────────────────────────────────

/// Counts describing a catalog that loaded cleanly.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogSummary {
    /// Number of books.
    books: usize,
    /// Last volume id.
    max_volume_id: u32,
    /// First volume id.
    min_volume_id: u32,
    /// Number of volumes.
    volumes: usize,
}

/// What `info` found in the working directory.
struct CurrentState {
    /// Catalog counts, or why the catalog did not load.
    catalog: Result<CatalogSummary, String>,
    /// Whether `.scripnav.toml` exists.
    config_found: bool,
}

// ── JSON output types ─────────────────────────────────────────────────

/// One documented exit code.
#[derive(Serialize)]
struct ExitCodeInfo {
    /// Process exit code.
    code: u8,
    /// What it signals.
    meaning: &'static str,
}

/// One token shape and the intent it produces.
#[derive(Serialize)]
struct GrammarRule {
    /// What the shape navigates to.
    meaning: &'static str,
    /// Token shape, e.g. `V:B`.
    shape: &'static str,
}

/// Top-level `info --json` document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoJson<'a> {
    /// State of the working directory.
    current_state: StateJson<'a>,
    /// Documented exit codes.
    exit_codes: Vec<ExitCodeInfo>,
    /// Token grammar.
    grammar: Vec<GrammarRule>,
    /// Crate version.
    version: &'static str,
}

/// JSON view of `CurrentState`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateJson<'a> {
    /// Counts when the catalog loaded.
    catalog: Option<&'a CatalogSummary>,
    /// Load failure otherwise.
    catalog_error: Option<&'a str>,
    /// Whether `.scripnav.toml` exists.
    config_found: bool,
}

/// Load config and catalog, keeping a load failure as text instead of failing.
fn gather_state(root: &Path, sources: Sources<'_>) -> CurrentState {
    let config_found = root.join(CONFIG_FILE).exists();

    let catalog = Config::load(root)
        .and_then(|config| return loader::load_catalog(&config.catalog_paths(sources.books, sources.volumes)))
        .map(|catalog| {
            let (min_volume_id, max_volume_id) = catalog.volume_id_range();
            return CatalogSummary {
                books: catalog.book_count(),
                max_volume_id,
                min_volume_id,
                volumes: catalog.volumes().len(),
            };
        })
        .map_err(|e| return e.to_string());

    return CurrentState { catalog, config_found };
}

/// Print the reference as JSON.
fn print_json(state: &CurrentState) {
    let info = InfoJson {
        current_state: StateJson {
            catalog: state.catalog.as_ref().ok(),
            catalog_error: state.catalog.as_ref().err().map(String::as_str),
            config_found: state.config_found,
        },
        exit_codes: EXIT_CODES.iter().map(|&(code, meaning)| return ExitCodeInfo { code, meaning }).collect(),
        grammar: vec![
            GrammarRule { meaning: "home", shape: "" },
            GrammarRule { meaning: "volume", shape: "V" },
            GrammarRule { meaning: "book", shape: "V:B" },
            GrammarRule { meaning: "chapter", shape: "V:B:C" },
        ],
        version: env!("CARGO_PKG_VERSION"),
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}

/// Print the reference as markdown.
fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_state(state);
    println!();
    print_markdown_exit_codes();
}

/// Exit code table.
fn print_markdown_exit_codes() {
    println!("## Exit Codes\n");
    println!("| Code | Meaning |");
    println!("|------|---------|");
    for (code, meaning) in EXIT_CODES {
        println!("| {code}    | {meaning} |");
    }
}

/// Grammar, commands and config keys.
fn print_markdown_header(version: &str) {
    println!(
        "\
# scripnav {version}

Scripture reference resolver: turns routing tokens into navigation views
(home, volume contents, book chapter list, chapter) and back.

## Token Grammar

    \"\"          home, every volume
    V           table of contents of volume V (must be a known volume id)
    V:B         chapter list of book B (V is not checked)
    V:B:C       chapter C of book B (chapter 0 only for single-page books)

Anything else resolves to home.

## Commands

    scripnav navigate <token>          Show the view for a token (fail-soft)
    scripnav resolve <token>           Strictly parse a token, explain rejections
    scripnav encode [V] [B] [C]        Build a token
    scripnav next <book> <chapter>     Following chapter, across books and volumes
    scripnav prev <book> <chapter>     Preceding chapter
    scripnav url <book> <chapter>      Content address (--verses, --jst)
    scripnav volumes                   List volumes and books
    scripnav watch <token-file>        Re-navigate whenever the file changes

## Configuration (.scripnav.toml)

    books = \"data/books.json\"          # JSON object of books keyed by id
    volumes = \"data/volumes.json\"      # JSON array of volumes
    content_url = \"http://...\"         # chapter content endpoint
    root_title = \"The Scriptures\"      # root breadcrumb label

Set SCRIPNAV_LOG (e.g. `scripnav=debug`) for diagnostics on stderr.

## Current State
"
    );
}

/// Config and catalog status lines.
fn print_markdown_state(state: &CurrentState) {
    if state.config_found {
        println!("Config:   {CONFIG_FILE} (found)");
    } else {
        println!("Config:   {CONFIG_FILE} (not found, using defaults)");
    }

    match &state.catalog {
        Ok(summary) => println!(
            "Catalog:  {} volumes (ids {}-{}), {} books",
            summary.volumes, summary.min_volume_id, summary.max_volume_id, summary.books
        ),
        Err(reason) => println!("Catalog:  unavailable ({reason})"),
    }
}

/// Output the comprehensive scripnav reference document.
pub fn run(sources: Sources<'_>, json: bool) {
    let root = PathBuf::from(".");
    let state = gather_state(&root, sources);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

//! Plain-text rendering of view states for the terminal.
//!
//! Every clickable thing is printed with the token it navigates to, so the
//! output can be fed straight back into `navigate`.

use std::fmt::Write as _;

use crate::navigator::{ChapterView, Crumb, Link, ViewState};

/// Breadcrumb levels joined with `" > "`.
fn render_breadcrumb(out: &mut String, crumbs: &[Crumb]) {
    let path = crumbs.iter().map(|c| return c.label.as_str()).collect::<Vec<_>>().join(" > ");
    let _ = writeln!(out, "{path}");
}

fn render_chapter(out: &mut String, view: &ChapterView) {
    render_breadcrumb(out, &view.breadcrumb);
    let _ = writeln!(out, "\n## {}\n", view.book.title_for(view.reference.chapter));
    render_neighbour(out, "prev", view.previous.as_ref(), "start of catalog");
    render_neighbour(out, "next", view.next.as_ref(), "end of catalog");
    let _ = writeln!(out, "content  {}", view.content_url);
}

fn render_link(out: &mut String, link: &Link) {
    let _ = writeln!(out, "- {}  #{}", link.title, link.token);
}

fn render_neighbour(out: &mut String, label: &str, link: Option<&Link>, missing: &str) {
    match link {
        None => {
            let _ = writeln!(out, "{label}     ({missing})");
        },
        Some(link) => {
            let _ = writeln!(out, "{label}     {}  #{}", link.title, link.token);
        },
    }
}

/// Render a view as plain text.
pub fn render_view(view: &ViewState) -> String {
    let mut out = String::new();
    match view {
        ViewState::BookChapterList { book, breadcrumb, chapters, .. } => {
            render_breadcrumb(&mut out, breadcrumb);
            let _ = writeln!(out, "\n## {}\n", book.full_name);
            for link in chapters {
                render_link(&mut out, link);
            }
        },
        ViewState::Chapter(chapter) => render_chapter(&mut out, chapter),
        ViewState::Home { breadcrumb, volumes } => {
            render_breadcrumb(&mut out, breadcrumb);
            for volume in volumes {
                let _ = writeln!(out, "\n## {}  #{}\n", volume.full_name, volume.id);
                for book in &volume.books {
                    render_link(&mut out, &Link::book_in_volume(volume, book));
                }
            }
        },
        ViewState::Volume { books, breadcrumb, volume } => {
            render_breadcrumb(&mut out, breadcrumb);
            let _ = writeln!(out, "\n## {}\n", volume.full_name);
            for link in books {
                render_link(&mut out, link);
            }
        },
    }
    return out;
}

//! Vertical card and table display for libraries and rules.

use lexitwin_core::model::{Dtl, DtLib, ReviewComment};
use lexitwin_core::ArtifactKind;
use lexitwin_workflow::ArtifactStore;

const MAX_TEXT_WIDTH: usize = 72;

// ── Tables ──

pub fn print_lib_table(libs: &[DtLib]) {
    if libs.is_empty() {
        println!("no statute libraries");
        return;
    }
    println!(
        "{:<14} {:<36} {:<14} {:<12} {}",
        "id", "name", "jurisdiction", "status", "version"
    );
    for lib in libs {
        println!(
            "{:<14} {:<36} {:<14} {:<12} {}",
            lib.id,
            truncate(&lib.name, 36),
            lib.jurisdiction,
            lib.status.as_str(),
            lib.version
        );
    }
}

pub fn print_dtl_table(dtls: &[Dtl]) {
    if dtls.is_empty() {
        println!("no rules");
        return;
    }
    println!(
        "{:<14} {:<40} {:<14} {:<20} {}",
        "id", "name", "category", "status", "reference"
    );
    for dtl in dtls {
        println!(
            "{:<14} {:<40} {:<14} {:<20} {}",
            dtl.id,
            truncate(&dtl.name, 40),
            dtl.category,
            dtl.review_status.as_str(),
            dtl.legal_reference
        );
    }
}

// ── Cards ──

/// Print one statute library as a vertical card.
pub fn print_lib_card(lib: &DtLib) {
    println!("=== {} ===", lib.name);
    println!();
    field("identifier", &lib.law_identifier);
    field("jurisdiction", &lib.jurisdiction);
    field("version", &lib.version);
    field("status", lib.status.as_str());
    field("effective date", &lib.effective_date);
    field("source", &lib.authoritative_url);
    field("description", &truncate(&lib.description, MAX_TEXT_WIDTH));
    if !lib.law_text.is_empty() {
        println!();
        println!("Full text ({} chars)", lib.law_text.len());
        println!("  {}", truncate(&lib.law_text, MAX_TEXT_WIDTH));
    }
}

/// Print one rule as a vertical card with its artifact completion.
pub fn print_dtl_card(dtl: &Dtl, store: &ArtifactStore) {
    println!("=== {} ===", dtl.name);
    println!();
    field("reference", &dtl.legal_reference);
    field("category", &dtl.category);
    field("version", &dtl.version);
    field("status", dtl.review_status.as_str());
    field("source", &dtl.authoritative_url);
    if !dtl.tags.is_empty() {
        field("tags", &dtl.tags.join(", "));
    }
    if let Some(owner) = dtl.owner {
        field("owner", &owner.to_string());
    }
    field("description", &truncate(&dtl.description, MAX_TEXT_WIDTH));
    if !dtl.review_comments.is_empty() {
        field("review comments", &dtl.review_comments);
    }
    println!();
    println!("Legal text");
    println!("  {}", truncate(&dtl.legal_text, MAX_TEXT_WIDTH));
    println!();

    let completion = store.completion();
    println!("Completion {}%", completion.ratio());
    for (name, present) in completion.items() {
        println!("  {:<18} {}", name, if present { "yes" } else { "no" });
    }
    if let Some(cases) = store.tests.current() {
        if !cases.is_empty() {
            println!();
            println!("Test cases ({})", cases.len());
            for case in cases {
                let result = case
                    .last_result
                    .map(|r| format!("{r:?}").to_lowercase())
                    .unwrap_or_else(|| "not run".to_string());
                println!("  {:<24} {}", truncate(&case.name, 24), result);
            }
        }
    }
    if let Some(logic) = store.logic.current() {
        if store.has(ArtifactKind::Logic) {
            println!();
            println!("Logic ({}, {} chars)", logic.language, logic.code.len());
        }
    }
}

pub fn print_comment_log(comments: &[ReviewComment]) {
    if comments.is_empty() {
        println!("no review comments");
        return;
    }
    for comment in comments {
        let kind = comment.kind.as_deref().unwrap_or("comment");
        println!(
            "[{}] {} ({}) {}",
            format_timestamp(&comment.timestamp),
            comment.author,
            kind,
            comment.role
        );
        println!("  {}", comment.comment);
    }
}

/// Render a backend RFC 3339 timestamp in local form; anything
/// unparseable passes through unchanged.
fn format_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn field(name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    println!("  {:<18} {}", name, value);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

// Colored terminal output for score tables and projection queries.
//
// main.rs and the pipeline delegate all terminal formatting here.

use colored::Colorize;

use crate::projection::projector::{AxesLabels, NearestTerms};
use crate::scoring::cred_tfidf::{BootstrapScore, CredScore};

/// Width of the term column before truncation.
const TERM_WIDTH: usize = 28;

/// Display the `top` most positive and most negative terms by delta score.
pub fn display_score_table(name: &str, rows: &[CredScore], top: usize) {
    if rows.is_empty() {
        println!("No terms to score.");
        return;
    }

    println!(
        "\n{}",
        format!("=== {} ({} terms) ===", name, rows.len()).bold()
    );

    let mut ranked: Vec<&CredScore> = rows
        .iter()
        .filter(|r| !r.delta_cred_tf_idf.is_nan())
        .collect();
    ranked.sort_by(|a, b| b.delta_cred_tf_idf.total_cmp(&a.delta_cred_tf_idf));

    print_header(&["pos", "neg", "delta"]);
    println!("  {}", "Positive".green().bold());
    for (i, row) in ranked.iter().take(top).enumerate() {
        print_score_row(i, row);
    }

    println!("  {}", "Negative".red().bold());
    for (i, row) in ranked.iter().rev().take(top).enumerate() {
        print_score_row(i, row);
    }

    let nan_count = rows.iter().filter(|r| r.delta_cred_tf_idf.is_nan()).count();
    if nan_count > 0 {
        println!(
            "\n  {} {} terms have undefined (NaN) scores",
            "!".yellow(),
            nan_count
        );
    }
    println!();
}

/// Display bootstrap statistics, strongest positive evidence first.
pub fn display_bootstrap_table(rows: &[BootstrapScore], top: usize) {
    if rows.is_empty() {
        println!("No terms to score.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Bootstrap cred-tf-idf ({} terms, experimental) ===", rows.len()).bold()
    );
    print_header(&["mean", "std", "p-value", "z-score"]);

    let mut ranked: Vec<&BootstrapScore> = rows.iter().filter(|r| !r.z_score.is_nan()).collect();
    ranked.sort_by(|a, b| b.z_score.total_cmp(&a.z_score));

    for (i, row) in ranked.iter().take(top).enumerate() {
        let p = format!("{:>10.4}", row.p_value);
        let p = if row.p_value >= 0.95 {
            p.green()
        } else if row.p_value <= 0.05 {
            p.red()
        } else {
            p.normal()
        };
        println!(
            "  {:>4}. {:<width$} {:>10.4} {:>10.4} {} {:>10.2}",
            i + 1,
            super::truncate_chars(&row.term, TERM_WIDTH),
            row.mean,
            row.std,
            p,
            row.z_score,
            width = TERM_WIDTH + 3,
        );
    }
    println!();
}

/// Display the extreme terms along each axis.
pub fn display_axes_labels(labels: &AxesLabels) {
    println!("\n{}", "=== Axis labels ===".bold());
    print_direction("right", &labels.right);
    print_direction("left", &labels.left);
    print_direction("top", &labels.top);
    print_direction("bottom", &labels.bottom);
    println!();
}

/// Display the terms nearest each compass point.
pub fn display_nearest_terms(nearest: &NearestTerms) {
    println!("\n{}", "=== Nearest terms ===".bold());
    print_direction("top_right", &nearest.top_right);
    print_direction("top", &nearest.top);
    print_direction("top_left", &nearest.top_left);
    print_direction("right", &nearest.right);
    print_direction("left", &nearest.left);
    print_direction("bottom_right", &nearest.bottom_right);
    print_direction("bottom", &nearest.bottom);
    print_direction("bottom_left", &nearest.bottom_left);
    println!();
}

fn print_header(columns: &[&str]) {
    let cols: Vec<String> = columns
        .iter()
        .map(|c| format!("{:>10}", c.dimmed()))
        .collect();
    println!(
        "  {:>4}  {:<width$} {}",
        "Rank".dimmed(),
        "Term".dimmed(),
        cols.join(" "),
        width = TERM_WIDTH + 3,
    );
    println!("  {}", "-".repeat(TERM_WIDTH + 10 + columns.len() * 11).dimmed());
}

fn print_score_row(i: usize, row: &CredScore) {
    let delta = format!("{:>10.4}", row.delta_cred_tf_idf);
    let delta = if row.delta_cred_tf_idf > 0.0 {
        delta.green()
    } else {
        delta.red()
    };
    println!(
        "  {:>4}. {:<width$} {:>10.4} {:>10.4} {}",
        i + 1,
        super::truncate_chars(&row.term, TERM_WIDTH),
        row.pos_cred_tfidf,
        row.neg_cred_tfidf,
        delta,
        width = TERM_WIDTH + 3,
    );
}

fn print_direction(label: &str, terms: &[String]) {
    println!("  {:<13} {}", format!("{label}:").bold(), terms.join(", ").dimmed());
}

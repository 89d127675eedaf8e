// src/reporting/console.rs
//! Colored terminal output.

use colored::Colorize;

use super::shared::{fmt_opt, fmt_p, pluralize};
use crate::hypothesis::{HypothesisOutcome, HypothesisReport, Verdict};
use crate::pipeline::{AnalysisReport, CommunityReport, RunReport};
use crate::stats::DescriptiveReport;
use crate::store::ImportSummary;

pub fn print_import(summary: &ImportSummary) {
    println!(
        "{} Imported {} {}, {} {}, {} {}.",
        "OK".green().bold(),
        summary.artists,
        pluralize("artist", summary.artists),
        summary.songs,
        pluralize("song", summary.songs),
        summary.links,
        pluralize("link", summary.links),
    );
    if summary.dropped_links > 0 {
        println!(
            "{} {} {} to unknown artists dropped.",
            "warning:".yellow().bold(),
            summary.dropped_links,
            pluralize("link", summary.dropped_links),
        );
    }
}

pub fn print_analysis(report: &AnalysisReport) {
    let s = &report.snapshot;
    let n = &report.network;

    println!("{}", "Collaboration network".cyan().bold());
    println!(
        "  {} artists, {} songs ({} collaborations)",
        s.artists, s.songs, s.collaborations
    );
    println!(
        "  {} nodes, {} edges, total weight {}, density {:.4}",
        n.nodes, n.edges, n.total_weight, n.density
    );
    if n.isolated_artists > 0 {
        println!(
            "  {}",
            format!("{} artists never collaborated", n.isolated_artists).dimmed()
        );
    }
    if s.genre_recoveries > 0 {
        println!(
            "  {} genre text recovered leniently for {} {}",
            "warning:".yellow(),
            s.genre_recoveries,
            pluralize("artist", s.genre_recoveries),
        );
    }

    if !n.top_betweenness.is_empty() {
        println!();
        println!("{}", "Top artists by betweenness".cyan().bold());
        for (rank, a) in n.top_betweenness.iter().enumerate() {
            println!(
                "  {:>2}. {:<32} {:.4}  {}",
                rank + 1,
                a.name,
                a.betweenness,
                format!("degree {:.3}", a.degree).dimmed()
            );
        }
    }

    println!();
    println!(
        "{} Persisted metrics for {} artists and {} songs.",
        "OK".green().bold(),
        report.artists_written,
        report.songs_written
    );
}

pub fn print_communities(report: &CommunityReport) {
    println!(
        "{} {} (modularity {:.4}, seed {}, resolution {})",
        "Communities:".cyan().bold(),
        report.count,
        report.modularity,
        report.seed,
        report.resolution
    );
    for p in &report.profiles {
        let dominant = p.dominant_genre.as_deref().unwrap_or("(no genres)");
        let top = p
            .top_genres
            .iter()
            .map(|(g, c)| format!("{g} ({c})"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  #{:<3} {:>4} {}  {}  {}",
            p.id,
            p.members,
            pluralize("member", p.members),
            dominant.yellow(),
            top.dimmed()
        );
        let members: Vec<&str> = report
            .membership
            .iter()
            .filter(|(_, c)| **c == p.id)
            .map(|(id, _)| id.as_str())
            .collect();
        println!("       {}", members.join(", ").dimmed());
    }
}

pub fn print_hypothesis(outcome: &HypothesisOutcome) {
    match outcome {
        HypothesisOutcome::Fitted(report) => print_fit(report),
        HypothesisOutcome::Failed {
            reason,
            guidance,
            total_rows,
            complete_rows,
        } => {
            println!(
                "{} {reason}",
                "Regression could not be fitted:".red().bold()
            );
            println!("  {complete_rows} of {total_rows} rows complete");
            println!("  {} {guidance}", "hint:".cyan());
        }
    }
}

fn print_fit(report: &HypothesisReport) {
    let fit = &report.fit;
    println!("{}", "Regression: popularity ~ betweenness + IHG + danceability + energy".cyan().bold());
    println!(
        "  {} of {} rows complete, R² {:.4}, adj. R² {:.4}, F {:.3} (p {})",
        report.complete_rows,
        report.total_rows,
        fit.r_squared,
        fit.adj_r_squared,
        fit.f_statistic,
        fmt_p(fit.f_p_value)
    );
    println!();
    println!(
        "  {:<28} {:>12} {:>10} {:>8} {:>8}",
        "term", "coef", "std err", "t", "p"
    );
    for t in &fit.terms {
        println!(
            "  {:<28} {:>12.4} {:>10.4} {:>8.3} {:>8}",
            t.name,
            t.coefficient,
            t.std_error,
            t.t_value,
            fmt_p(t.p_value)
        );
    }
    println!();
    print_verdict("Betweenness hypothesis", &report.betweenness, report.significance);
    print_verdict("Genre heterogeneity", &report.heterogeneity, report.significance);
}

fn print_verdict(label: &str, v: &Verdict, significance: f64) {
    let detail = format!(
        "coef {:.4}, p {} (alpha {significance})",
        v.coefficient,
        fmt_p(v.p_value)
    );
    if v.confirmed {
        println!("  {} {label}: {}", "CONFIRMED".green().bold(), detail);
    } else {
        println!("  {} {label}: {}", "NOT CONFIRMED".yellow().bold(), detail);
    }
}

pub fn print_stats(report: &DescriptiveReport) {
    println!(
        "{} over {} {}",
        "Descriptive statistics".cyan().bold(),
        report.songs,
        pluralize("song", report.songs)
    );
    println!(
        "  {:<13} {:>5} {:>9} {:>9} {:>9} {:>9} {:>9} {:>8} {:>8}",
        "column", "n", "mean", "std", "min", "median", "max", "cv%", "skew"
    );
    for c in &report.columns {
        let Some(s) = &c.summary else {
            println!("  {:<13} {}", c.name, "no values".dimmed());
            continue;
        };
        println!(
            "  {:<13} {:>5} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>8.2} {:>8}",
            c.name,
            s.count,
            s.mean,
            s.std,
            s.min,
            s.median,
            s.max,
            s.cv_percent,
            fmt_opt(s.skewness, 3)
        );
    }

    println!();
    println!("{}", "Pearson correlation".cyan().bold());
    let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
    print!("  {:<13}", "");
    for name in &names {
        print!(" {:>12}", truncate(name, 12));
    }
    println!();
    for (name, row) in names.iter().zip(&report.correlations) {
        print!("  {name:<13}");
        for r in row {
            print!(" {:>12}", fmt_opt(*r, 3));
        }
        println!();
    }
}

fn truncate(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(i, _)| &s[..i])
}

pub fn print_run(report: &RunReport) {
    print_analysis(&report.analysis);
    println!();
    print_communities(&report.communities);
    println!();
    print_hypothesis(&report.hypothesis);
}

pub fn print_export(rows: usize, target: &str) {
    println!(
        "{} Exported {rows} {} to {target}.",
        "OK".green().bold(),
        pluralize("song", rows)
    );
}

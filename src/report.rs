//! Console and JSON reporting of a search

use std::io::Write;

use serde::Serialize;

use crate::engine::{
    LengthSummary, Progress, SearchObserver, SearchOutcome, SearchParams, Target,
};

/// Prints search progress to stdout
///
/// In quiet mode nothing is printed, leaving stdout free for a JSON report.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
    /// A `\r` progress line is on screen and needs a newline first
    progress_line: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            progress_line: false,
        }
    }

    fn end_progress_line(&mut self) {
        if self.progress_line {
            println!();
            self.progress_line = false;
        }
    }
}

impl SearchObserver for ConsoleReporter {
    fn on_start(&mut self, params: &SearchParams) {
        if self.quiet {
            return;
        }
        let target = params.target();
        match target.signature() {
            Some(sig) => println!("Target selector for {}: {}", sig, target.selector()),
            None => println!("Target selector: {}", target.selector()),
        }
        println!("Alphabet: {} ({} symbols)", params.alphabet().as_str(), params.alphabet().len());
        println!(
            "Candidates: {}<body>{}, body length {}..={}",
            params.prefix(),
            params.suffix(),
            params.min_length(),
            params.max_length()
        );
        println!("Using {} worker threads", params.workers());
    }

    fn on_length_start(&mut self, length: usize, total: u128, _workers: usize) {
        if self.quiet {
            return;
        }
        self.end_progress_line();
        println!("Searching length {} with total {} candidates...", length, total);
    }

    fn on_progress(&mut self, progress: &Progress) {
        if self.quiet {
            return;
        }
        let percent = if progress.total > 0 {
            progress.hashed as f64 * 100.0 / progress.total as f64
        } else {
            0.0
        };
        print!(
            "\rHashrate: {:.0} H/s | Hashes: {} | {:.2}% | Time: {:.0}s",
            progress.hashrate(),
            progress.hashed,
            percent,
            progress.elapsed.as_secs_f64()
        );
        std::io::stdout().flush().ok();
        self.progress_line = true;
    }

    fn on_length_finished(&mut self, _summary: &LengthSummary) {
        if self.quiet {
            return;
        }
        self.end_progress_line();
    }
}

/// Human-readable final result
pub fn print_outcome(outcome: &SearchOutcome, target: &Target) {
    let stats = outcome.stats();
    match outcome {
        SearchOutcome::Found { collision, .. } => {
            println!("\nCollision found!");
            println!(
                "  {} -> {}",
                target.signature().unwrap_or("<target>"),
                collision.target_selector
            );
            println!("  {} -> {}", collision.candidate, collision.selector);
        }
        SearchOutcome::Exhausted { .. } => {
            println!("\nNo collision found.");
        }
    }
    println!(
        "  Hashes: {} ({:.0} H/s) | Lengths: {} | Time: {:.2}s",
        stats.hashed,
        stats.hashrate(),
        stats.lengths_searched,
        stats.elapsed.as_secs_f64()
    );
}

/// Machine-readable final result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub found: bool,
    pub target: Option<String>,
    pub target_selector: String,
    pub candidate: Option<String>,
    pub candidate_selector: Option<String>,
    pub length: Option<usize>,
    pub index: Option<u128>,
    pub lengths_searched: usize,
    pub hashed: u64,
    pub elapsed_secs: f64,
}

impl Report {
    pub fn new(outcome: &SearchOutcome, target: &Target) -> Self {
        let stats = outcome.stats();
        let collision = outcome.collision();
        Self {
            found: outcome.is_found(),
            target: target.signature().map(str::to_string),
            target_selector: format!("0x{}", target.selector()),
            candidate: collision.map(|c| c.candidate.clone()),
            candidate_selector: collision.map(|c| format!("0x{}", c.selector)),
            length: collision.map(|c| c.length),
            index: collision.map(|c| c.index),
            lengths_searched: stats.lengths_searched,
            hashed: stats.hashed,
            elapsed_secs: stats.elapsed.as_secs_f64(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Terminal rendering of download progress.
//!
//! The view owns its own counters; it only learns about progress through
//! [`ProgressEvent`]s read from a [`ProgressReceiver`].

use std::collections::VecDeque;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::download::{ProgressEvent, ProgressReceiver};
use crate::icon::IconIdentity;

/// Number of recently saved icons listed above the bar.
pub const RECENT_WINDOW: usize = 10;

/// Spinner helpers for consistent progress indicators.
pub mod spinner {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Duration;

    /// Create a spinner with consistent styling.
    pub fn create(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("\u{28FB}\u{28F9}\u{28FC}\u{28F8}\u{28FE}\u{28F6}\u{28F7}\u{28E7}\u{28CF}\u{28DF} ")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    /// Spinner that draws nothing, for quiet mode.
    pub fn hidden() -> ProgressBar {
        ProgressBar::hidden()
    }

    /// Finish spinner with success message.
    pub fn finish_success(spinner: &ProgressBar, message: &str) {
        spinner.finish_and_clear();
        if !spinner.is_hidden() {
            println!("\x1b[32m[OK]\x1b[0m {}", message);
        }
    }

    /// Clear spinner silently.
    pub fn clear(spinner: &ProgressBar) {
        spinner.finish_and_clear();
    }
}

/// What the view observed before it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutcome {
    pub received: usize,
    pub total: usize,
}

impl ViewOutcome {
    pub fn is_complete(&self) -> bool {
        self.received == self.total
    }
}

/// Progress bar with a rolling list of the last saved icons.
pub struct DownloadView {
    bar: ProgressBar,
    total: usize,
    received: usize,
    recent: VecDeque<String>,
}

impl DownloadView {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("Downloading icons...\n{msg}\n\n{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(bar, total)
    }

    /// A view that tracks events without drawing.
    pub fn hidden(total: usize) -> Self {
        Self::with_bar(ProgressBar::hidden(), total)
    }

    fn with_bar(bar: ProgressBar, total: usize) -> Self {
        Self {
            bar,
            total,
            received: 0,
            recent: VecDeque::with_capacity(RECENT_WINDOW),
        }
    }

    pub fn on_saved(&mut self, icon: &IconIdentity) {
        if self.recent.len() == RECENT_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(icon.key());
        self.received += 1;

        let log: Vec<String> = self.recent.iter().map(|k| k.dimmed().to_string()).collect();
        self.bar.set_message(log.join("\n"));
        self.bar.set_position(self.received as u64);
    }

    /// Icons currently listed above the bar, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    /// Tear the bar down; print the summary line if everything arrived.
    pub fn finish(&self) -> ViewOutcome {
        self.bar.finish_and_clear();
        let outcome = ViewOutcome {
            received: self.received,
            total: self.total,
        };
        if outcome.is_complete() && !self.bar.is_hidden() {
            println!("{}", format!("{} icons downloaded", self.total).green());
        }
        outcome
    }

    /// Signal start, then render events until termination.
    pub async fn run(mut self, mut receiver: ProgressReceiver) -> ViewOutcome {
        receiver.start();
        while let Some(event) = receiver.recv().await {
            match event {
                ProgressEvent::Saved(icon) => self.on_saved(&icon),
                ProgressEvent::Terminate => break,
            }
        }
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::{self, ProgressSink};

    #[test]
    fn test_recent_window_rolls() {
        let mut view = DownloadView::hidden(15);
        for i in 0..12 {
            view.on_saved(&IconIdentity::new("mdi", format!("icon-{i}")));
        }
        let recent: Vec<&str> = view.recent().collect();
        assert_eq!(recent.len(), RECENT_WINDOW);
        assert_eq!(recent.first(), Some(&"mdi:icon-2"));
        assert_eq!(recent.last(), Some(&"mdi:icon-11"));

        let outcome = view.finish();
        assert_eq!(outcome.received, 12);
        assert!(!outcome.is_complete());
    }

    #[tokio::test]
    async fn test_run_until_terminate() {
        let (sink, receiver) = download::channel();
        let view = tokio::spawn(DownloadView::hidden(2).run(receiver));

        sink.wait_for_start().await;
        sink.notify_saved(&IconIdentity::new("mdi", "home"));
        sink.notify_saved(&IconIdentity::new("mdi", "home-outline"));
        sink.request_termination();

        let outcome = view.await.unwrap();
        assert_eq!(outcome, ViewOutcome { received: 2, total: 2 });
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn test_run_ends_when_sink_dropped() {
        let (sink, receiver) = download::channel();
        let view = tokio::spawn(DownloadView::hidden(3).run(receiver));

        sink.wait_for_start().await;
        sink.notify_saved(&IconIdentity::new("mdi", "home"));
        drop(sink);

        let outcome = view.await.unwrap();
        assert_eq!(outcome.received, 1);
    }
}

// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::models::{DonationFigures, FigureSource, Progress};
use crate::utils::format_brl;

/// Resolution of the terminal bar; one step is a tenth of a percent.
const BAR_STEPS: u64 = 1000;

/// Text and geometry for the donation progress block.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub bar_width_percent: f64,
    pub bar_label: String,
    pub collected: String,
    pub total: String,
    pub remaining: String,
    pub source: FigureSource,
}

impl ProgressView {
    pub fn new(figures: &DonationFigures, source: FigureSource) -> Self {
        let progress = Progress::from_figures(figures);

        Self {
            bar_width_percent: progress.percentage,
            bar_label: format!("{:.1}%", progress.percentage),
            collected: format_brl(figures.raised),
            total: format_brl(figures.needed),
            remaining: format_brl(progress.remaining),
            source,
        }
    }

    fn bar_position(&self) -> u64 {
        (self.bar_width_percent / 100.0 * BAR_STEPS as f64).round() as u64
    }
}

/// Draw the bar once and print the three amounts under it.
pub fn render_progress(view: &ProgressView) {
    let bar = ProgressBar::new(BAR_STEPS);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green/white} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    bar.set_position(view.bar_position());
    bar.abandon_with_message(view.bar_label.clone());

    println!("Collected: {}", view.collected);
    println!("Goal:      {}", view.total);
    println!("Remaining: {}", view.remaining);
    if view.source.is_backup() {
        println!("⚠️  Live figures unavailable, showing backup data");
    }
}

/// Spinner shown while a fetch is in flight. Cleared when dropped.
pub struct LoadingIndicator {
    bar: ProgressBar,
}

impl LoadingIndicator {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }

    pub fn spinner(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_from_backup_figures() {
        let figures = DonationFigures {
            raised: 7734.45,
            needed: 46181.25,
        };
        let view = ProgressView::new(&figures, FigureSource::Backup);

        assert_eq!(view.bar_label, "16.7%");
        assert_eq!(view.collected, "R$ 7.734,45");
        assert_eq!(view.total, "R$ 46.181,25");
        assert_eq!(view.remaining, "R$ 38.446,80");
        assert_eq!(view.bar_position(), 167);
    }

    #[test]
    fn test_view_when_goal_exceeded() {
        let figures = DonationFigures {
            raised: 50000.0,
            needed: 46181.25,
        };
        let view = ProgressView::new(&figures, FigureSource::Live);

        assert_eq!(view.bar_label, "100.0%");
        assert_eq!(view.remaining, "R$ 0,00");
        assert_eq!(view.bar_position(), BAR_STEPS);
    }

    #[test]
    fn test_loading_indicator_cleared_on_drop() {
        let bar = ProgressBar::hidden();
        {
            let _loading = LoadingIndicator::new(bar.clone());
            assert!(!bar.is_finished());
        }
        assert!(bar.is_finished());
    }
}

// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

/// Amount raised so far and the fundraising goal, both in BRL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonationFigures {
    pub raised: f64,
    pub needed: f64,
}

/// Where a pair of figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureSource {
    Live,
    Backup,
}

impl FigureSource {
    pub fn is_backup(self) -> bool {
        self == FigureSource::Backup
    }
}

/// Values derived from a pair of figures for the progress bar and chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Always within `0.0..=100.0`
    pub percentage: f64,
    /// Never negative
    pub remaining: f64,
}

impl Progress {
    pub fn from_figures(figures: &DonationFigures) -> Self {
        let DonationFigures { raised, needed } = *figures;

        let percentage = if needed > 0.0 {
            raised / needed * 100.0
        } else if raised > 0.0 {
            100.0
        } else {
            0.0
        };

        Self {
            // NaN inputs land on 0 rather than poisoning the bar
            percentage: if percentage.is_nan() {
                0.0
            } else {
                percentage.clamp(0.0, 100.0)
            },
            remaining: (needed - raised).max(0.0),
        }
    }

    /// Share of the goal a given amount represents, for chart legends.
    pub fn share_of_goal(amount: f64, needed: f64) -> f64 {
        if needed > 0.0 {
            amount / needed * 100.0
        } else {
            0.0
        }
    }
}

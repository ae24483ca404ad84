// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use reqwest::Client;
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::{fetch_donation_figures_or_backup, fetch_rate_or_backup};
use crate::config::Config;
use crate::models::{DonationFigures, ExchangeRate, FigureSource, Progress};
use crate::progress::{render_progress, LoadingIndicator, ProgressView};
use crate::scheduler::Poller;
use crate::utils::{euro_equivalent, format_eur, format_rate};

/// Everything shown on the donation page after one refresh.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub figures: DonationFigures,
    pub figure_source: FigureSource,
    pub progress: Progress,
    pub rate: ExchangeRate,
    pub goal_in_euros: f64,
}

/// Fetch the exchange rate, then the donation figures. Never fails; missing
/// data is replaced by the configured backups.
pub async fn refresh(client: &Client, config: &Config, loading: LoadingIndicator) -> DashboardSnapshot {
    let rate = fetch_rate_or_backup(client, &config.rate, loading).await;
    let (figures, figure_source) = fetch_donation_figures_or_backup(client, &config.sheet).await;

    DashboardSnapshot {
        progress: Progress::from_figures(&figures),
        goal_in_euros: euro_equivalent(figures.needed, rate.rate),
        figures,
        figure_source,
        rate,
    }
}

/// Print the rate, and the goal in euros when one is known.
pub fn print_rate(rate: &ExchangeRate, goal_in_euros: Option<f64>) {
    println!("EUR/BRL: {}", format_rate(rate.rate));
    if let Some(goal) = goal_in_euros {
        println!("Goal in euros: {}", format_eur(goal));
    }
    println!("{}", rate.status_label());
}

/// The two page timers: donation progress and exchange rate.
pub struct Pollers {
    pub donation: Poller,
    pub rate: Poller,
    goal_in_euros: watch::Receiver<Option<f64>>,
}

impl Pollers {
    pub fn set_visible(&self, visible: bool) {
        self.donation.set_visible(visible);
        self.rate.set_visible(visible);
    }

    /// Goal converted by the latest rate poll, `None` until the first one.
    pub fn goal_in_euros(&self) -> watch::Receiver<Option<f64>> {
        self.goal_in_euros.clone()
    }

    pub async fn stop(self) {
        self.donation.stop().await;
        self.rate.stop().await;
    }
}

/// Fetch the rate, then convert the goal published by the donation poller.
/// Waits for the first goal so the initial conversion never uses a stale one.
async fn convert_goal(
    client: &Client,
    config: &Config,
    goal_rx: &mut watch::Receiver<Option<f64>>,
    loading: LoadingIndicator,
) -> (ExchangeRate, Option<f64>) {
    let rate = fetch_rate_or_backup(client, &config.rate, loading).await;
    // Err means the donation poller is gone; print the rate alone
    let goal = goal_rx.wait_for(Option::is_some).await.ok().and_then(|goal| *goal);
    let goal_in_euros = goal.map(|goal| euro_equivalent(goal, rate.rate));
    (rate, goal_in_euros)
}

/// Start both pollers. The rate poller converts the most recent goal
/// published by the donation poller.
pub fn spawn_pollers(client: Client, config: Arc<Config>) -> Pollers {
    let (goal_tx, goal_rx) = watch::channel(None::<f64>);
    let goal_tx = Arc::new(goal_tx);
    let (euros_tx, euros_rx) = watch::channel(None::<f64>);
    let euros_tx = Arc::new(euros_tx);

    let donation = {
        let client = client.clone();
        let config = config.clone();
        Poller::start("donation", config.polling.donation_interval(), move || {
            let client = client.clone();
            let config = config.clone();
            let goal_tx = goal_tx.clone();
            async move {
                let (figures, source) =
                    fetch_donation_figures_or_backup(&client, &config.sheet).await;
                goal_tx.send_replace(Some(figures.needed));
                render_progress(&ProgressView::new(&figures, source));
            }
        })
    };

    let rate = Poller::start("rate", config.polling.rate_interval(), move || {
        let client = client.clone();
        let config = config.clone();
        let mut goal_rx = goal_rx.clone();
        let euros_tx = euros_tx.clone();
        async move {
            let loading = LoadingIndicator::spinner("Fetching rate");
            let (rate, goal_in_euros) = convert_goal(&client, &config, &mut goal_rx, loading).await;
            if goal_in_euros.is_some() {
                euros_tx.send_replace(goal_in_euros);
            }
            print_rate(&rate, goal_in_euros);
        }
    });

    Pollers {
        donation,
        rate,
        goal_in_euros: euros_rx,
    }
}

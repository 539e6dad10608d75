//! Interstitial session simulation.
//!
//! Drives an [`AdManager`] wired to the simulated network provider and the
//! custom ad rotation, so dispatch settings can be tried out before they ship.

use std::path::Path;

use ad_dispatch_common::network::NetworkEvent;
use ad_dispatch_common::settings::Settings;
use ad_dispatch_common::{build_simulated_session, DispatchState, InterstitialOutcome};
use serde::Serialize;

use crate::config::load_and_merge_config;
use crate::error::CliError;
use crate::OutputFormat;

/// What the simulated call site does.
#[derive(Debug, Clone, Copy)]
pub struct SimulationPlan {
    /// Number of interstitial requests.
    pub calls: u32,
    /// Call-site interval passed with every request (0 disables throttling).
    pub interval: u32,
    /// Remove all ads after this many requests.
    pub remove_after: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CallRecord {
    pub call: u32,
    pub outcome: InterstitialOutcome,
    pub custom_ad: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub custom: u32,
    pub network: u32,
    pub throttled: u32,
    pub ads_removed: u32,
}

impl Totals {
    fn add(&mut self, outcome: InterstitialOutcome) {
        match outcome {
            InterstitialOutcome::Custom => self.custom += 1,
            InterstitialOutcome::Network => self.network += 1,
            InterstitialOutcome::Throttled => self.throttled += 1,
            InterstitialOutcome::AdsRemoved => self.ads_removed += 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub provider: &'static str,
    pub calls: Vec<CallRecord>,
    pub totals: Totals,
    pub state: DispatchState,
    pub network_events: Vec<NetworkEvent>,
}

/// Run a simulated session against the given settings.
pub fn run_simulation(settings: &Settings, plan: SimulationPlan) -> SimulationReport {
    let mut session = build_simulated_session(settings);
    let mut calls = Vec::with_capacity(plan.calls as usize);
    let mut totals = Totals::default();

    session.manager.show_banner(settings.network.banner_delay());

    for call in 1..=plan.calls {
        let outcome = session.manager.request_interstitial(plan.interval);
        let custom_ad = match outcome {
            InterstitialOutcome::Custom => session.custom.visible_ad().map(|ad| ad.id.clone()),
            _ => None,
        };
        totals.add(outcome);
        calls.push(CallRecord {
            call,
            outcome,
            custom_ad,
        });

        if plan.remove_after == Some(call) {
            log::info!("Removing ads after call {}", call);
            session.manager.remove_all();
        }
    }

    SimulationReport {
        provider: settings.network.provider.as_str(),
        calls,
        totals,
        state: session.manager.state().clone(),
        network_events: session.network.events(),
    }
}

/// Load settings from `file`, simulate and print the report.
pub fn simulate(
    file: &Path,
    plan: SimulationPlan,
    format: &OutputFormat,
    verbose: bool,
) -> Result<(), CliError> {
    let (settings, _merged_toml) = load_and_merge_config(file, verbose)?;
    let report = run_simulation(&settings, plan);

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_text(report: &SimulationReport) {
    println!("Provider: {}", report.provider);
    for record in &report.calls {
        match &record.custom_ad {
            Some(id) => println!("call {:>4}: {:?} ({})", record.call, record.outcome, id),
            None => println!("call {:>4}: {:?}", record.call, record.outcome),
        }
    }
    println!();
    println!("Custom:      {}", report.totals.custom);
    println!("Network:     {}", report.totals.network);
    println!("Throttled:   {}", report.totals.throttled);
    println!("Ads removed: {}", report.totals.ads_removed);
    println!(
        "Custom ads left this session: {}",
        report.state.remaining_custom_ads()
    );
}

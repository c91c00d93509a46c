use crate::infra::build_submission_service;
use clap::Args;
use mission17::config::AppConfig;
use mission17::error::AppError;
use mission17::workflows::submissions::{SubmissionDraft, SubmissionStatus};
use serde_json::json;

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Number of missions to submit
    #[arg(long, default_value_t = 100)]
    pub(crate) count: u32,
    /// AI confidence attached to every submission (percentage)
    #[arg(long, default_value_t = 99.0)]
    pub(crate) confidence: f64,
    /// Wallet credited for auto-approved missions
    #[arg(long, default_value = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4")]
    pub(crate) wallet: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SimulationTally {
    pub(crate) approved: u32,
    pub(crate) flagged: u32,
    pub(crate) pending: u32,
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_submission_service(&config);

    println!(
        "Submitting {} missions at {}% confidence",
        args.count, args.confidence
    );

    let mut tally = SimulationTally::default();
    for index in 0..args.count {
        let draft = SubmissionDraft {
            user_id: "simulation-user".to_string(),
            username: Some("Simulator".to_string()),
            mission_id: "HITL_SIMULATION".to_string(),
            mission_title: format!("HITL Simulation #{}", index + 1),
            image_uri: None,
            wallet_address: Some(args.wallet.clone()),
            confidence: Some(json!(args.confidence)),
            status: None,
        };

        let record = service.submit(draft)?;
        tally.record(record.status);
    }

    let spot_check = service.gate().policy().config();
    let expected = if args.confidence > spot_check.high_confidence_threshold {
        f64::from(args.count) * spot_check.spot_check_rate
    } else {
        0.0
    };

    println!("\nResults");
    println!("  Automatically approved: {}", tally.approved);
    println!(
        "  Flagged for review:     {} (expected ~{:.1})",
        tally.flagged, expected
    );
    if tally.pending > 0 {
        println!("  Left pending:           {}", tally.pending);
    }
    if expected > 0.0 && tally.flagged == 0 {
        println!("\nNo missions were flagged. This is possible but rare; try a larger --count.");
    }

    Ok(())
}

impl SimulationTally {
    fn record(&mut self, status: SubmissionStatus) {
        match status {
            SubmissionStatus::Approved => self.approved += 1,
            SubmissionStatus::PendingAdminReview => self.flagged += 1,
            SubmissionStatus::Pending | SubmissionStatus::Rejected => self.pending += 1,
        }
    }
}

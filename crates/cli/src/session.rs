//! Scripted learner session.

use anyhow::Result;
use progress_core::{
    Change, MissionId, MultiplierContext, OverallProgress, SubscriptionTier,
};
use progress_runtime::{
    LearnerContext, ManualClock, MutationOutcome, MutationRequest, ProgressService,
};
use serde_json::json;

pub async fn run(service: &ProgressService, clock: &ManualClock) -> Result<()> {
    let mission = MissionId::FIRST;
    let learner = LearnerContext {
        multipliers: MultiplierContext {
            subscription: SubscriptionTier::Premium,
            balance: 1_500,
            ..MultiplierContext::default()
        },
        streak_days: 4,
        days_ahead: 2,
        party_members: 0,
    };

    println!("=== Starting position ===");
    print_overall(&service.progress_overall().await?);

    match service.briefing(mission).await {
        Ok(briefing) => println!("\nBriefing {}: {}\n  {}", mission, briefing.title, briefing.body),
        Err(err) if err.is_not_found() => println!("\nNo briefing for {mission}"),
        Err(err) => return Err(err.into()),
    }

    println!("\n=== Working through {mission} ===");
    let mut bites = mission.bites();
    if let Some(first) = bites.next() {
        service.mutate(Change::StartBite { bite: first }).await?;
        service
            .mutate(
                MutationRequest::new(Change::SaveBiteDraft { bite: first })
                    .with_draft(json!({"answer": "let x = 1;"})),
            )
            .await?;
        println!("draft saved for {first}: {}", service.bite_draft(first).is_some());
        submit(service, first, &learner).await?;
        println!("draft cleared after submit: {}", service.bite_draft(first).is_none());
    }
    for bite in bites {
        clock.advance(5 * 60 * 1000);
        submit(service, bite, &learner).await?;
    }

    println!("\n=== Judging {mission} ===");
    let outcome = service
        .mutate(Change::CompleteMission {
            mission,
            passed: false,
        })
        .await?;
    println!("failed attempt -> {}", outcome.applied.retry_phase);

    let outcome = service.grant_provisional_retry(mission).await?;
    println!("provisional grant -> {}", outcome.applied.retry_phase);

    let outcome = service
        .mutate(Change::ConvertProvisionalRetry { mission })
        .await?;
    println!("converted -> {}", outcome.applied.retry_phase);

    let outcome = service
        .mutate(
            MutationRequest::new(Change::CompleteMission {
                mission,
                passed: true,
            })
            .with_learner(learner.clone()),
        )
        .await?;
    println!("second attempt -> {}", outcome.applied.retry_phase);
    print_outcome(format!("{mission} passed"), &outcome);

    let retry = service.retry_state(mission).await?;
    println!(
        "retries used: {}/{}",
        retry.retry_attempts, retry.max_retries
    );

    println!("\n=== Final position ===");
    print_overall(&service.progress_overall().await?);

    let stats = service.cache_stats();
    println!(
        "\ncache: {} entries, {} hits, {} misses, {} invalidations",
        stats.entries, stats.hits, stats.misses, stats.invalidations
    );
    Ok(())
}

async fn submit(
    service: &ProgressService,
    bite: progress_core::BiteId,
    learner: &LearnerContext,
) -> Result<()> {
    let outcome = service
        .mutate(
            MutationRequest::new(Change::SubmitBite {
                bite,
                checkpoint_passed: true,
                perfect_score: true,
            })
            .with_learner(learner.clone()),
        )
        .await?;
    print_outcome(bite.to_string(), &outcome);
    Ok(())
}

fn print_outcome(label: String, outcome: &MutationOutcome) {
    let mission = &outcome.chain.mission;
    println!(
        "{label}: mission {}/{} ({}%)",
        mission.bites.completed, mission.bites.total, mission.snapshot.percentage
    );
    for reward in &outcome.rewards {
        println!(
            "  {} reward: {} baraka (base {}, bonus {}, x{:.4}), {} xp",
            reward.milestone.kind,
            reward.baraka.final_amount,
            reward.baraka.base_amount,
            reward.baraka.bonus_total(),
            reward.baraka.multiplier,
            reward.xp.final_amount,
        );
    }
}

fn print_overall(overall: &OverallProgress) {
    println!(
        "overall: {} ({}/{} adventures, {}/{} missions, {}/{} bites)",
        overall.snapshot.status,
        overall.adventures.completed,
        overall.adventures.total,
        overall.missions.completed,
        overall.missions.total,
        overall.bites.completed,
        overall.bites.total,
    );
    match &overall.current_position {
        Some(position) => match position.stage {
            Some(stage) => println!("current: adventure {}, stage {}", position.adventure, stage),
            None => println!("current: adventure {}", position.adventure),
        },
        None => println!("current: curriculum complete"),
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent region runner with error isolation.
//!
//! Each region runs its own pipeline (fetch policy, collect sources, build
//! prompt, ask the model, decode the verdict) as a task on the current
//! runtime. A failing or panicking region never prevents the others from
//! finishing; its failure is recorded in its [`RegionOutcome`].

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::collect::Collector;
use crate::config::RegionTarget;
use crate::error::{Error, ExitCode, Result};
use crate::model::ModelClient;
use crate::policy::PolicySource;
use crate::prompt;
use crate::region::Region;
use crate::verdict::{DecoderKind, Verdict};

/// What the model said about one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Raw reply text.
    pub reply: String,
    /// Decoded verdict.
    pub verdict: Verdict,
}

/// Result of one region's pipeline.
#[derive(Debug)]
pub struct RegionOutcome {
    pub region: Region,
    pub result: Result<Assessment>,
}

impl RegionOutcome {
    /// True only for an explicit pass.
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(a) if a.verdict.is_pass())
    }
}

/// Outcomes of every region, in target order.
#[derive(Debug, Default)]
pub struct RunResult {
    pub outcomes: Vec<RegionOutcome>,
}

impl RunResult {
    /// True iff every region passed.
    ///
    /// An empty run passes; callers reject empty target lists up front.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(RegionOutcome::passed)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed()).count()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.passed() {
            ExitCode::Success
        } else {
            ExitCode::Failed
        }
    }
}

/// Runs region pipelines concurrently.
pub struct Runner {
    policies: Arc<dyn PolicySource>,
    model: Arc<dyn ModelClient>,
    collector: Arc<Collector>,
    decoder: DecoderKind,
}

impl Runner {
    pub fn new(
        policies: Arc<dyn PolicySource>,
        model: Arc<dyn ModelClient>,
        collector: Arc<Collector>,
        decoder: DecoderKind,
    ) -> Self {
        Self {
            policies,
            model,
            collector,
            decoder,
        }
    }

    /// Check every target and gather outcomes in target order.
    pub async fn run(&self, targets: &[RegionTarget]) -> RunResult {
        let mut tasks = JoinSet::new();
        for (index, target) in targets.iter().enumerate() {
            let pipeline = Pipeline {
                target: target.clone(),
                policies: Arc::clone(&self.policies),
                model: Arc::clone(&self.model),
                collector: Arc::clone(&self.collector),
                decoder: self.decoder,
            };
            tasks.spawn(async move { (index, pipeline.run().await) });
        }

        let mut slots: Vec<Option<Result<Assessment>>> = targets.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                // The slot stays empty and is reported below.
                Err(err) => tracing::error!("region task did not complete: {}", err),
            }
        }

        let outcomes = targets
            .iter()
            .zip(slots)
            .map(|(target, slot)| {
                let result = slot.unwrap_or_else(|| {
                    Err(Error::Internal(format!(
                        "{} check panicked",
                        target.region.key()
                    )))
                });
                if let Err(err) = &result {
                    tracing::warn!("{} check failed: {}", target.region.key(), err);
                }
                RegionOutcome {
                    region: target.region,
                    result,
                }
            })
            .collect();

        RunResult { outcomes }
    }
}

/// Everything one region task owns.
struct Pipeline {
    target: RegionTarget,
    policies: Arc<dyn PolicySource>,
    model: Arc<dyn ModelClient>,
    collector: Arc<Collector>,
    decoder: DecoderKind,
}

impl Pipeline {
    async fn run(self) -> Result<Assessment> {
        let region = self.target.region;

        let policy = self.policies.fetch(&self.target.policy_url).await?;
        let bundle = self.collector.collect()?;
        tracing::info!(
            "sending {} policy and {} file(s) to the model",
            region.label(),
            bundle.len()
        );

        let prompt = prompt::build(region, &policy, &bundle, self.decoder);
        let reply = self.model.complete(&prompt).await?;
        let verdict = self.decoder.decoder().decode(&reply, region);
        tracing::info!("{}: {}", region.key(), verdict);

        Ok(Assessment { reply, verdict })
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

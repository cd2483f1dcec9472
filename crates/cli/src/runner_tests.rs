// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use super::*;
use crate::collect::Selection;
use crate::test_utils::create_tree;
use crate::walker::WalkerConfig;

const EU_URL: &str = "https://policies.test/gdpr-europe.txt";
const US_URL: &str = "https://policies.test/gdpr-us.txt";

/// Serves policies from memory; unknown URLs are a 404.
struct FakePolicies(HashMap<&'static str, &'static str>);

impl FakePolicies {
    fn both() -> Self {
        Self(HashMap::from([(EU_URL, "EU policy text"), (US_URL, "US policy text")]))
    }
}

#[async_trait]
impl PolicySource for FakePolicies {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.0
            .get(url)
            .map(|text| text.to_string())
            .ok_or_else(|| Error::Fetch {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Answers per region, chosen by the policy label in the prompt.
struct FakeModel {
    europe: &'static str,
    us: &'static str,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    fn new(europe: &'static str, us: &'static str) -> Self {
        Self {
            europe,
            us,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ModelClient for FakeModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains("=== BEGIN Europe (GDPR) POLICY ===") {
            Ok(self.europe.to_string())
        } else {
            Ok(self.us.to_string())
        }
    }
}

struct PanickingModel;

#[async_trait]
impl ModelClient for PanickingModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.contains("US Privacy") {
            panic!("model exploded");
        }
        Ok("Europe policy PASSED".to_string())
    }
}

fn targets() -> Vec<RegionTarget> {
    vec![
        RegionTarget {
            region: Region::Europe,
            policy_url: EU_URL.to_string(),
        },
        RegionTarget {
            region: Region::Us,
            policy_url: US_URL.to_string(),
        },
    ]
}

fn frontend() -> TempDir {
    let tmp = TempDir::new().unwrap();
    create_tree(
        tmp.path(),
        &[("index.html", "<form></form>"), ("app.js", "track(user)")],
    );
    tmp
}

fn runner(
    root: &TempDir,
    policies: impl PolicySource + 'static,
    model: Arc<dyn ModelClient>,
    decoder: DecoderKind,
) -> Runner {
    let collector = Collector::new(root.path(), Selection::Tree, WalkerConfig::default());
    Runner::new(Arc::new(policies), model, Arc::new(collector), decoder)
}

// =============================================================================
// AGGREGATION
// =============================================================================

#[tokio::test]
async fn all_regions_pass_exits_zero() {
    let root = frontend();
    let model = Arc::new(FakeModel::new("Europe policy PASSED", "US policy PASSED"));
    let runner = runner(&root, FakePolicies::both(), model, DecoderKind::Phrase);

    let result = runner.run(&targets()).await;

    assert!(result.passed());
    assert_eq!(result.exit_code(), ExitCode::Success);
    assert_eq!(result.failed_count(), 0);
}

#[tokio::test]
async fn one_failed_region_exits_one() {
    let root = frontend();
    let model = Arc::new(FakeModel::new("Europe policy PASSED", "US policy FAILED"));
    let runner = runner(&root, FakePolicies::both(), model, DecoderKind::Phrase);

    let result = runner.run(&targets()).await;

    assert!(!result.passed());
    assert_eq!(result.exit_code(), ExitCode::Failed);
    let us = &result.outcomes[1];
    assert_eq!(us.region, Region::Us);
    assert_eq!(us.result.as_ref().unwrap().verdict, Verdict::Failed);
}

#[tokio::test]
async fn unrecognized_reply_does_not_pass() {
    let root = frontend();
    let model = Arc::new(FakeModel::new("Looks fine to me.", "Looks fine to me."));
    let runner = runner(&root, FakePolicies::both(), model, DecoderKind::Structured);

    let result = runner.run(&targets()).await;

    assert!(!result.passed());
    for outcome in &result.outcomes {
        assert_eq!(outcome.result.as_ref().unwrap().verdict, Verdict::Unrecognized);
    }
}

#[tokio::test]
async fn outcomes_follow_target_order() {
    let root = frontend();
    let model = Arc::new(FakeModel::new("Compliant", "Compliant"));
    let runner = runner(&root, FakePolicies::both(), model, DecoderKind::Compliant);

    let mut reversed = targets();
    reversed.reverse();
    let result = runner.run(&reversed).await;

    let regions: Vec<Region> = result.outcomes.iter().map(|o| o.region).collect();
    assert_eq!(regions, [Region::Us, Region::Europe]);
    assert!(result.passed());
}

// =============================================================================
// ERROR ISOLATION
// =============================================================================

#[tokio::test]
async fn policy_404_fails_only_that_region() {
    let root = frontend();
    let policies = FakePolicies(HashMap::from([(EU_URL, "EU policy text")]));
    let model = Arc::new(FakeModel::new(
        r#"{"region": "Europe", "passed": true}"#,
        r#"{"region": "US", "passed": true}"#,
    ));
    let runner = runner(&root, policies, model.clone(), DecoderKind::Structured);

    let result = runner.run(&targets()).await;

    assert!(result.outcomes[0].passed());
    assert!(matches!(
        result.outcomes[1].result,
        Err(Error::Fetch { status: 404, .. })
    ));
    assert_eq!(result.exit_code(), ExitCode::Failed);
    // Only Europe reached the model.
    assert_eq!(model.prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_root_fails_every_region() {
    let tmp = TempDir::new().unwrap();
    let collector = Collector::new(
        tmp.path().join("gdpr-frontend"),
        Selection::Tree,
        WalkerConfig::default(),
    );
    let runner = Runner::new(
        Arc::new(FakePolicies::both()),
        Arc::new(FakeModel::new("Compliant", "Compliant")),
        Arc::new(collector),
        DecoderKind::Compliant,
    );

    let result = runner.run(&targets()).await;

    assert_eq!(result.failed_count(), 2);
    assert!(
        result
            .outcomes
            .iter()
            .all(|o| matches!(o.result, Err(Error::NotFound(_))))
    );
}

#[tokio::test]
async fn panicking_region_becomes_internal_error() {
    let root = frontend();
    let runner = runner(
        &root,
        FakePolicies::both(),
        Arc::new(PanickingModel),
        DecoderKind::Phrase,
    );

    let result = runner.run(&targets()).await;

    assert!(result.outcomes[0].passed());
    assert!(matches!(result.outcomes[1].result, Err(Error::Internal(_))));
    assert!(!result.passed());
}

// =============================================================================
// PROMPT CONTENT
// =============================================================================

#[tokio::test]
async fn prompt_carries_policy_and_sources() {
    let root = frontend();
    let model = Arc::new(FakeModel::new("Compliant", "Compliant"));
    let runner = runner(&root, FakePolicies::both(), model.clone(), DecoderKind::Compliant);

    runner.run(&targets()[..1]).await;

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("EU policy text"));
    assert!(prompts[0].contains("track(user)"));
    assert!(prompts[0].contains("<form></form>"));
}

#[test]
fn empty_run_passes() {
    let result = RunResult::default();
    assert!(result.passed());
    assert_eq!(result.exit_code(), ExitCode::Success);
}

//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running the privacy-gate binary against temp
//! projects and a mockito server standing in for the policy host and
//! the model endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::{Predicate, PredicateBooleanExt};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::path::Path;
use std::process::Command;

/// Trait for converting into a string predicate.
/// Allows passing `&str` (as contains) or any `Predicate<str>`.
pub trait IntoStrPredicate<P: Predicate<str>> {
    fn into_predicate(self) -> P;
}

impl IntoStrPredicate<predicates::str::ContainsPredicate> for &str {
    fn into_predicate(self) -> predicates::str::ContainsPredicate {
        predicates::str::contains(self)
    }
}

impl<P: Predicate<str>> IntoStrPredicate<P> for P {
    fn into_predicate(self) -> P {
        self
    }
}

/// Returns a Command configured to run the privacy-gate binary with a
/// clean environment for the variables it reads.
pub fn privacy_gate_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("privacy-gate"));
    cmd.env_remove("OPENROUTER_API_KEY")
        .env_remove("PRIVACY_GATE_CONFIG")
        .env_remove("PRIVACY_GATE_LOG")
        .env_remove("COLOR")
        .env("NO_COLOR", "1");
    cmd
}

/// Create a builder for `privacy-gate check`.
pub fn check() -> CheckBuilder {
    CheckBuilder::default()
}

/// High-level check builder for fluent test assertions
#[derive(Default)]
pub struct CheckBuilder {
    dir: Option<std::path::PathBuf>,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

#[allow(dead_code)]
impl CheckBuilder {
    /// Set working directory
    pub fn pwd(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set an environment variable
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Provide an API key in the default variable
    pub fn with_api_key(self) -> Self {
        self.env("OPENROUTER_API_KEY", "sk-test")
    }

    pub fn passes(self) -> RunAssert {
        run_passes(self.command())
    }

    pub fn fails(self) -> RunAssert {
        run_fails(self.command())
    }

    pub fn exits(self, code: i32) -> RunAssert {
        run_exits(self.command(), code)
    }

    fn command(self) -> Command {
        let mut cmd = privacy_gate_cmd();
        cmd.arg("check");
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

fn run_passes(mut cmd: Command) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert!(
        output.status.success(),
        "expected check to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    RunAssert { output }
}

fn run_fails(mut cmd: Command) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert!(
        !output.status.success(),
        "expected check to fail, but it passed\nstdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    RunAssert { output }
}

fn run_exits(mut cmd: Command, code: i32) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit code {}, got {:?}\nstdout: {}\nstderr: {}",
        code,
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    RunAssert { output }
}

pub struct RunAssert {
    output: std::process::Output,
}

#[allow(dead_code)]
impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected (with diff on failure)
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout matches predicate.
    pub fn stdout_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            predicate.into_predicate().eval(&stdout),
            "stdout predicate failed:\n{}",
            stdout
        );
        self
    }

    /// Assert stdout does not match predicate.
    pub fn stdout_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            !predicate.into_predicate().eval(&stdout),
            "stdout should NOT match predicate:\n{}",
            stdout
        );
        self
    }

    /// Assert stderr matches predicate.
    pub fn stderr_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            predicate.into_predicate().eval(&stderr),
            "stderr predicate failed:\n{}",
            stderr
        );
        self
    }
}

// =============================================================================
// Projects
// =============================================================================

/// A temp directory holding a frontend tree and optional config.
pub struct Project {
    dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl Project {
    /// Create an empty project with no files
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Create a project with a small `web/` frontend wired to `server`.
    pub fn frontend(server: &MockServer) -> Self {
        let project = Self::empty();
        project.config(&server.config());
        project.file("web/index.html", "<form><input name=\"email\"></form>");
        project.file("web/js/app.js", "analytics.track(user.email);");
        project.file("web/logo.png", "PNG");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write privacy-gate.toml
    pub fn config(&self, content: &str) {
        self.file("privacy-gate.toml", content);
    }

    /// Write a file, creating parent directories
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }
}

/// Run git in the project, panicking on failure.
pub fn git(project: &Project, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(project.path())
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a git repo with one commit on `main`.
pub fn git_init(project: &Project) {
    git(project, &["init", "-q"]);
    git(project, &["config", "user.email", "test@example.com"]);
    git(project, &["config", "user.name", "Test User"]);
    git(project, &["add", "."]);
    git(project, &["commit", "-q", "-m", "chore: initial commit"]);
    git(project, &["branch", "-M", "main"]);
}

// =============================================================================
// Mock HTTP server
// =============================================================================

pub const EU_POLICY_PATH: &str = "/policies/gdpr-europe.txt";
pub const US_POLICY_PATH: &str = "/policies/gdpr-us.txt";
pub const CHAT_PATH: &str = "/api/v1/chat/completions";

/// Body patterns telling the two regions' prompts apart.
pub const EU_PROMPT: &str = r"BEGIN Europe \(GDPR\) POLICY";
pub const US_PROMPT: &str = r"BEGIN US Privacy POLICY";

const EU_POLICY: &str = "Consent is required before tracking.";
const US_POLICY: &str = "Users may opt out of data sale.";

/// One canned response, expected to be hit `hits` times (default once).
pub struct Route {
    method: &'static str,
    path: &'static str,
    body: Option<Matcher>,
    bearer: Option<String>,
    status: usize,
    response: String,
    hits: usize,
}

#[allow(dead_code)]
impl Route {
    pub fn get(path: &'static str, status: usize, response: &str) -> Self {
        Self {
            method: "GET",
            path,
            body: None,
            bearer: None,
            status,
            response: response.to_string(),
            hits: 1,
        }
    }

    /// A chat completion whose reply content is `reply`.
    pub fn reply(reply: &str) -> Self {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": reply}}]
        });
        Self::chat(200, &body.to_string())
    }

    /// A raw chat-completions response.
    pub fn chat(status: usize, response: &str) -> Self {
        Self {
            method: "POST",
            path: CHAT_PATH,
            body: None,
            bearer: None,
            status,
            response: response.to_string(),
            hits: 1,
        }
    }

    /// Only match requests whose body matches the `pattern` regex.
    pub fn when(mut self, pattern: &str) -> Self {
        self.body = Some(Matcher::Regex(pattern.to_string()));
        self
    }

    /// Only match requests carrying `Authorization: Bearer <key>`.
    pub fn bearer(mut self, key: &str) -> Self {
        self.bearer = Some(format!("Bearer {key}"));
        self
    }

    /// Expect this route to be hit exactly `hits` times.
    pub fn hits(mut self, hits: usize) -> Self {
        self.hits = hits;
        self
    }
}

/// A `mockito` server standing in for the policy host and the model.
///
/// Requests no route matches are answered by mockito with a 501.
pub struct MockServer {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

#[allow(dead_code)]
impl MockServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let mut server = Server::new();
        let mocks = routes
            .into_iter()
            .map(|route| {
                let mut mock = server
                    .mock(route.method, route.path)
                    .with_status(route.status)
                    .with_body(route.response)
                    .expect(route.hits);
                if let Some(body) = route.body {
                    mock = mock.match_body(body);
                }
                if let Some(bearer) = route.bearer {
                    mock = mock.match_header("authorization", bearer.as_str());
                }
                mock.create()
            })
            .collect();
        Self { server, mocks }
    }

    /// Both policies published, each fetched once.
    pub fn with_policies(mut routes: Vec<Route>) -> Self {
        routes.push(Route::get(EU_POLICY_PATH, 200, EU_POLICY));
        routes.push(Route::get(US_POLICY_PATH, 200, US_POLICY));
        Self::start(routes)
    }

    /// Every endpoint served, none of them expected to be requested.
    pub fn untouched() -> Self {
        Self::start(vec![
            Route::get(EU_POLICY_PATH, 200, EU_POLICY).hits(0),
            Route::get(US_POLICY_PATH, 200, US_POLICY).hits(0),
            Route::reply("Compliant").hits(0),
        ])
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.url(), path)
    }

    /// Config pointing every endpoint at this server.
    pub fn config(&self) -> String {
        format!(
            "version = 1\n\
             \n\
             [source]\n\
             root = \"web\"\n\
             \n\
             [model]\n\
             endpoint = \"{}\"\n\
             \n\
             [regions.europe]\n\
             policy_url = \"{}\"\n\
             \n\
             [regions.us]\n\
             policy_url = \"{}\"\n",
            self.url(CHAT_PATH),
            self.url(EU_POLICY_PATH),
            self.url(US_POLICY_PATH),
        )
    }

    /// Assert every route was hit exactly as often as expected.
    pub fn assert_hits(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

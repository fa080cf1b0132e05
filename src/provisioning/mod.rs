//! Repository provisioning workflow
//!
//! Runs the bootstrap as a fixed sequence of stages:
//!
//! 1. **ResolveDirectory** – app data directory (see [`resolve_directory`])
//! 2. **LoadOrCreateCredential** – read the token, or prompt and persist it
//! 3. **FetchOwnerIdentity** – who the token belongs to; failure halts
//! 4. **NameAndCreateRepository** – prompt, normalize, create; re-prompt on name collision
//! 5. **ComposeRemoteUrl** – provider-specific remote URL
//! 6. **LocalInit** – `git init` unless already a repository
//! 7. **IgnoreFile** – optional `.gitignore` from the template service
//! 8. **StageCommitPush** – add, commit, branch, remote, push
//!
//! Each stage is a method with typed inputs and outputs. The collaborators
//! (prompt, hosting provider, git, templates) are injected so the whole run
//! can execute without a terminal or network.

pub mod local;
pub mod prompt;

use crate::config::RepoInitConfig;
use crate::integrations::{
    CreateOutcome, HostConnector, OwnerIdentity, RepoHost, TemplateFetch, TemplateSource,
};
use crate::storage::{self, AppDirectory};
use crate::style;
use crate::{RepoInitError, Result};
use local::{CommitAction, PublishTarget, RemoteAction, VersionControl};
use prompt::Prompter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use local::PublishReport;

/// Name of the ignore file written into the working directory
pub const IGNORE_FILE: &str = ".gitignore";

const TOKEN_PROMPT: &str = "Enter GitHub auth token";
const NAME_PROMPT: &str = "Enter the repository name";
const NAME_TAKEN_PROMPT: &str = "The given name already exists, choose a new one";
const NAME_EMPTY_PROMPT: &str = "Repository name cannot be empty, enter a name";
const FIRST_TOPIC_PROMPT: &str = "Write gitignore topic or X to skip";
const MORE_TOPIC_PROMPT: &str = "Add more topic or Q to quit";

/// Workflow stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveDirectory,
    LoadOrCreateCredential,
    FetchOwnerIdentity,
    NameAndCreateRepository,
    ComposeRemoteUrl,
    LocalInit,
    IgnoreFile,
    StageCommitPush,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolveDirectory => "resolve-directory",
            Stage::LoadOrCreateCredential => "load-or-create-credential",
            Stage::FetchOwnerIdentity => "fetch-owner-identity",
            Stage::NameAndCreateRepository => "name-and-create-repository",
            Stage::ComposeRemoteUrl => "compose-remote-url",
            Stage::LocalInit => "local-init",
            Stage::IgnoreFile => "ignore-file",
            Stage::StageCommitPush => "stage-commit-push",
        };
        write!(f, "{}", name)
    }
}

/// What happened in the IgnoreFile stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitignoreOutcome {
    /// A `.gitignore` was already present
    AlreadyExists,
    /// Turned off for this run
    Disabled,
    /// The user skipped it or gave no topics
    Declined,
    Written { topics: Vec<String> },
    /// The template service failed; no file was written
    Failed { reason: String },
}

/// Per-run settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Directory that becomes the local repository
    pub workdir: PathBuf,
    /// Name used for the first creation attempt instead of prompting
    pub repo_name: Option<String>,
    pub private: bool,
    /// Offer to generate a `.gitignore`
    pub gitignore: bool,
    pub default_branch: String,
    pub remote_name: String,
    pub commit_message: String,
    pub credential_file: String,
}

impl ProvisionOptions {
    pub fn from_config(config: &RepoInitConfig, workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            repo_name: None,
            private: config.private,
            gitignore: true,
            default_branch: config.default_branch.clone(),
            remote_name: config.remote_name.clone(),
            commit_message: config.commit_message.clone(),
            credential_file: config.credential_file.clone(),
        }
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub app_dir: AppDirectory,
    pub owner: OwnerIdentity,
    pub repository: String,
    pub remote_url: String,
    /// True when `git init` ran
    pub initialized: bool,
    pub gitignore: GitignoreOutcome,
    pub remote: RemoteAction,
    pub commit: CommitAction,
}

/// Stage 1: resolve (and create) the app data directory.
///
/// Runs before a [`Provisioner`] exists because configuration lives there.
pub fn resolve_directory(home: Option<&Path>, app_name: &str) -> Result<AppDirectory> {
    tracing::info!(stage = %Stage::ResolveDirectory, app = %app_name, "Entering stage");

    let dir = match home {
        Some(home) => AppDirectory::resolve_in(home, app_name),
        None => AppDirectory::resolve(app_name),
    };

    dir.inspect_err(|e| {
        tracing::error!(
            stage = %Stage::ResolveDirectory,
            error = %e,
            "Cannot continue without app data directory"
        );
    })
}

/// Lowercase and hyphenate a repository name
pub fn normalize_repo_name(raw: &str) -> String {
    raw.trim().replace(' ', "-").to_lowercase()
}

/// Prompt for ignore-template topics until the quit sentinel.
///
/// `x` on the first prompt skips; `q` ends the list. Both are
/// case-insensitive. Entries are trimmed and lowercased; blanks are dropped.
pub fn collect_topics(prompter: &mut dyn Prompter) -> Result<Vec<String>> {
    let mut topics = Vec::new();

    let first = prompter.input(FIRST_TOPIC_PROMPT)?;
    if first.trim().eq_ignore_ascii_case("x") {
        return Ok(topics);
    }

    let mut entry = first;
    while !entry.trim().eq_ignore_ascii_case("q") {
        let topic = entry.trim().to_lowercase();
        if !topic.is_empty() && !topics.contains(&topic) {
            topics.push(topic);
        }
        entry = prompter.input(MORE_TOPIC_PROMPT)?;
    }

    Ok(topics)
}

/// Workflow context: configuration plus injected collaborators
pub struct Provisioner<'a> {
    app_dir: AppDirectory,
    options: ProvisionOptions,
    prompter: &'a mut dyn Prompter,
    connector: &'a dyn HostConnector,
    vcs: &'a dyn VersionControl,
    templates: &'a dyn TemplateSource,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        app_dir: AppDirectory,
        options: ProvisionOptions,
        prompter: &'a mut dyn Prompter,
        connector: &'a dyn HostConnector,
        vcs: &'a dyn VersionControl,
        templates: &'a dyn TemplateSource,
    ) -> Self {
        Self {
            app_dir,
            options,
            prompter,
            connector,
            vcs,
            templates,
        }
    }

    /// Run stages 2–8
    pub async fn run(mut self) -> Result<ProvisionReport> {
        let token = self.load_or_create_credential()?;
        let host = self.connector.connect(&token)?;

        let owner = self.fetch_owner_identity(host.as_ref()).await?;
        let repository = self.name_and_create_repository(host.as_ref()).await?;
        let remote_url = self.compose_remote_url(host.as_ref(), &owner, &repository);
        let initialized = self.local_init()?;
        let gitignore = self.ignore_file().await?;
        let published = self.stage_commit_push(&remote_url)?;

        Ok(ProvisionReport {
            app_dir: self.app_dir,
            owner,
            repository,
            remote_url,
            initialized,
            gitignore,
            remote: published.remote,
            commit: published.commit,
        })
    }

    /// Stage 2: read the stored token, or prompt for one and store it
    pub fn load_or_create_credential(&mut self) -> Result<String> {
        tracing::info!(stage = %Stage::LoadOrCreateCredential, "Entering stage");
        let path = self.app_dir.file(&self.options.credential_file);

        if path.exists() {
            let document = storage::read_credentials(&path)?;
            return Ok(document.token()?.to_string());
        }

        let token = loop {
            let answer = self.prompter.secret(TOKEN_PROMPT)?;
            let answer = answer.trim();
            if !answer.is_empty() {
                break answer.to_string();
            }
            println!("  {} A token is required", style::notice());
        };

        storage::write_credentials(vec![storage::token_record(&token)], &path)?;
        println!(
            "  {} Token saved to {}",
            style::check(),
            style::path(&path.display().to_string())
        );
        Ok(token)
    }

    /// Stage 3: fetch the owner identity; any failure halts the run
    pub async fn fetch_owner_identity(&self, host: &dyn RepoHost) -> Result<OwnerIdentity> {
        tracing::info!(
            stage = %Stage::FetchOwnerIdentity,
            provider = host.provider(),
            "Entering stage"
        );

        match host.fetch_owner_identity().await {
            Ok(owner) => {
                println!("  {} Signed in as {}", style::check(), style::name(&owner.login));
                Ok(owner)
            }
            Err(e) => {
                println!("  {} repo access failed!", style::cross());
                tracing::error!(
                    stage = %Stage::FetchOwnerIdentity,
                    error = %e,
                    "Owner identity unavailable"
                );
                Err(e)
            }
        }
    }

    /// Stage 4: choose a name and create the remote repository.
    ///
    /// Loops only while the name is taken; every other failure halts.
    pub async fn name_and_create_repository(&mut self, host: &dyn RepoHost) -> Result<String> {
        tracing::info!(stage = %Stage::NameAndCreateRepository, "Entering stage");

        let mut raw = match self.options.repo_name.take() {
            Some(name) => name,
            None => self.prompter.input(NAME_PROMPT)?,
        };

        loop {
            let name = normalize_repo_name(&raw);
            if name.is_empty() {
                raw = self.prompter.input(NAME_EMPTY_PROMPT)?;
                continue;
            }

            let outcome = host.create_repository(&name, self.options.private).await?;
            if outcome.is_success() {
                println!(
                    "  {} Repo created on GitHub successfully: {}",
                    style::check(),
                    style::name(&name)
                );
                return Ok(name);
            }

            if outcome == CreateOutcome::NameExists {
                println!("  {} {}", style::notice(), style::outcome(false, outcome.message()));
                raw = self.prompter.input(NAME_TAKEN_PROMPT)?;
                continue;
            }

            println!(
                "  {} Error message: {}",
                style::cross(),
                style::outcome(false, &outcome.to_string())
            );
            return Err(RepoInitError::Provisioning(outcome.to_string()));
        }
    }

    /// Stage 5: remote URL for the new repository
    pub fn compose_remote_url(
        &self,
        host: &dyn RepoHost,
        owner: &OwnerIdentity,
        name: &str,
    ) -> String {
        let url = host.remote_url(owner, name);
        tracing::info!(stage = %Stage::ComposeRemoteUrl, url = %url, "Remote URL composed");
        url
    }

    /// Stage 6: make the working directory a repository
    pub fn local_init(&self) -> Result<bool> {
        tracing::info!(
            stage = %Stage::LocalInit,
            workdir = %self.options.workdir.display(),
            "Entering stage"
        );

        let initialized = local::ensure_repository(self.vcs)?;
        if initialized {
            println!("  {} Initialized git repository", style::check());
        }
        Ok(initialized)
    }

    /// Stage 7: optional `.gitignore` from the template service
    pub async fn ignore_file(&mut self) -> Result<GitignoreOutcome> {
        tracing::info!(stage = %Stage::IgnoreFile, "Entering stage");
        let path = self.options.workdir.join(IGNORE_FILE);

        if path.exists() {
            println!("  {} gitignore file exists", style::notice());
            return Ok(GitignoreOutcome::AlreadyExists);
        }

        if !self.options.gitignore {
            return Ok(GitignoreOutcome::Disabled);
        }

        let topics = collect_topics(&mut *self.prompter)?;
        if topics.is_empty() {
            println!("  {} No gitignore file added.", style::dim("-"));
            return Ok(GitignoreOutcome::Declined);
        }

        match self.templates.fetch(&topics).await {
            Ok(TemplateFetch::Fetched(body)) => {
                fs::write(&path, body)?;
                println!("  {} gitignore file generated successfully!", style::check());
                Ok(GitignoreOutcome::Written { topics })
            }
            Ok(TemplateFetch::Rejected(status)) => {
                println!(
                    "  {} Error occurred while taking response from the gitignore service (HTTP {})",
                    style::cross(),
                    status.as_u16()
                );
                Ok(GitignoreOutcome::Failed {
                    reason: format!("HTTP {}", status.as_u16()),
                })
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    url = %self.templates.url_for(&topics),
                    "Template fetch failed"
                );
                println!("  {} Could not reach the gitignore service: {}", style::cross(), e);
                Ok(GitignoreOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Stage 8: add, commit, rename branch, set remote, push
    pub fn stage_commit_push(&self, remote_url: &str) -> Result<PublishReport> {
        tracing::info!(stage = %Stage::StageCommitPush, "Entering stage");

        let target = PublishTarget {
            remote_name: &self.options.remote_name,
            remote_url,
            branch: &self.options.default_branch,
            commit_message: &self.options.commit_message,
        };

        let report = local::publish(self.vcs, &target)?;
        println!(
            "  {} Pushed {} to {}",
            style::check(),
            style::name(&self.options.default_branch),
            style::path(remote_url)
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::local::testing::RecordingVcs;
    use super::prompt::ScriptedPrompter;
    use super::*;
    use crate::integrations::{ApiFailure, CreateRepoRequest, RepoListing, RepoSummary, Submission};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StubHost {
        existing: Mutex<Vec<RepoSummary>>,
        identity_fails: bool,
        create_status: StatusCode,
    }

    impl StubHost {
        fn with_existing(names: &[&str]) -> Self {
            Self {
                existing: Mutex::new(names.iter().map(|n| RepoSummary::named(*n)).collect()),
                identity_fails: false,
                create_status: StatusCode::CREATED,
            }
        }
    }

    #[async_trait]
    impl RepoHost for StubHost {
        fn provider(&self) -> &str {
            "stub"
        }

        async fn fetch_owner_identity(&self) -> Result<OwnerIdentity> {
            if self.identity_fails {
                return Err(RepoInitError::Unauthorized("Bad credentials".to_string()));
            }
            Ok(OwnerIdentity {
                login: "alice".to_string(),
                html_url: "https://github.com/alice".to_string(),
            })
        }

        async fn list_repositories(&self) -> Result<RepoListing> {
            Ok(RepoListing::Available(self.existing.lock().unwrap().clone()))
        }

        async fn submit_repository(&self, request: &CreateRepoRequest) -> Result<Submission> {
            if self.create_status != StatusCode::CREATED {
                return Ok(Submission::Rejected(ApiFailure::classify(self.create_status)));
            }
            self.existing
                .lock()
                .unwrap()
                .push(RepoSummary::named(request.name.clone()));
            Ok(Submission::Created)
        }

        async fn remove_repository(&self, _owner: &str, _name: &str) -> Result<StatusCode> {
            Ok(StatusCode::NO_CONTENT)
        }
    }

    struct NoConnector;

    impl HostConnector for NoConnector {
        fn connect(&self, _token: &str) -> Result<Box<dyn RepoHost>> {
            Err(RepoInitError::Other("not used".to_string()))
        }
    }

    struct StubTemplates {
        response: Option<TemplateFetch>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TemplateSource for StubTemplates {
        fn url_for(&self, topics: &[String]) -> String {
            crate::integrations::template_url("https://templates.test/api", topics)
        }

        async fn fetch(&self, topics: &[String]) -> Result<TemplateFetch> {
            self.requested.lock().unwrap().push(self.url_for(topics));
            self.response
                .clone()
                .ok_or_else(|| RepoInitError::Other("connection refused".to_string()))
        }
    }

    fn templates(response: Option<TemplateFetch>) -> StubTemplates {
        StubTemplates {
            response,
            requested: Mutex::new(Vec::new()),
        }
    }

    struct Fixture {
        _temp: TempDir,
        app_dir: AppDirectory,
        workdir: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("alice");
        fs::create_dir(&home).unwrap();
        let workdir = temp.path().join("project");
        fs::create_dir(&workdir).unwrap();
        let app_dir = AppDirectory::resolve_in(&home, "demo").unwrap();
        Fixture {
            _temp: temp,
            app_dir,
            workdir,
        }
    }

    fn options(fx: &Fixture) -> ProvisionOptions {
        ProvisionOptions::from_config(&RepoInitConfig::new(), &fx.workdir)
    }

    #[test]
    fn test_normalize_repo_name() {
        assert_eq!(normalize_repo_name("My Cool Repo"), "my-cool-repo");
        assert_eq!(normalize_repo_name("  demo  "), "demo");
        assert_eq!(normalize_repo_name("   "), "");
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::ResolveDirectory.to_string(), "resolve-directory");
        assert_eq!(Stage::StageCommitPush.to_string(), "stage-commit-push");
    }

    #[test]
    fn test_collect_topics() {
        let mut prompter = ScriptedPrompter::new(["Python", " node ", "", "python", "Q"]);
        let topics = collect_topics(&mut prompter).unwrap();
        assert_eq!(topics, vec!["python", "node"]);
        assert_eq!(prompter.asked()[0], FIRST_TOPIC_PROMPT);
        assert_eq!(prompter.asked()[1], MORE_TOPIC_PROMPT);
    }

    #[test]
    fn test_collect_topics_skip() {
        let mut prompter = ScriptedPrompter::new(["X"]);
        assert!(collect_topics(&mut prompter).unwrap().is_empty());

        let mut prompter = ScriptedPrompter::new(["q"]);
        assert!(collect_topics(&mut prompter).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_directory_stage() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("alice");
        fs::create_dir(&home).unwrap();

        let dir = resolve_directory(Some(home.as_path()), "demo").unwrap();
        assert!(dir.is_created());

        let missing = temp.path().join("nobody");
        assert!(resolve_directory(Some(missing.as_path()), "demo").is_err());
    }

    #[test]
    fn test_credential_prompted_then_reused() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);

        let mut prompter = ScriptedPrompter::new(["", "  ghp_secret  "]);
        let token = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        )
        .load_or_create_credential()
        .unwrap();
        assert_eq!(token, "ghp_secret");
        assert_eq!(prompter.asked(), [TOKEN_PROMPT, TOKEN_PROMPT]);

        let mut silent = ScriptedPrompter::new(Vec::<String>::new());
        let token = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut silent,
            &NoConnector,
            &vcs,
            &tpl,
        )
        .load_or_create_credential()
        .unwrap();
        assert_eq!(token, "ghp_secret");
        assert!(silent.asked().is_empty());
    }

    #[test]
    fn test_corrupt_credential_is_fatal() {
        let fx = fixture();
        fs::write(fx.app_dir.file("auth_token.json"), "not json").unwrap();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);
        let mut prompter = ScriptedPrompter::new(["unused"]);

        let err = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        )
        .load_or_create_credential()
        .unwrap_err();
        assert!(matches!(err, RepoInitError::Json(_)));
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_owner_identity_failure_halts() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let mut host = StubHost::with_existing(&[]);
        host.identity_fails = true;

        let provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        let err = provisioner.fetch_owner_identity(&host).await.unwrap_err();
        assert!(matches!(err, RepoInitError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_name_collision_reprompts() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);
        let host = StubHost::with_existing(&["demo", "demo-2"]);
        let mut prompter = ScriptedPrompter::new(["Demo", "demo 2", "Demo 3"]);

        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        let name = provisioner.name_and_create_repository(&host).await.unwrap();
        assert_eq!(name, "demo-3");
        drop(provisioner);

        assert_eq!(prompter.asked(), [NAME_PROMPT, NAME_TAKEN_PROMPT, NAME_TAKEN_PROMPT]);
    }

    #[tokio::test]
    async fn test_preset_name_and_empty_reprompt() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);
        let host = StubHost::with_existing(&[]);
        let mut prompter = ScriptedPrompter::new(["my repo"]);
        let mut opts = options(&fx);
        opts.repo_name = Some("   ".to_string());

        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            opts,
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        let name = provisioner.name_and_create_repository(&host).await.unwrap();
        assert_eq!(name, "my-repo");
        drop(provisioner);

        assert_eq!(prompter.asked(), [NAME_EMPTY_PROMPT]);
    }

    #[tokio::test]
    async fn test_creation_failure_halts_without_retry() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);
        let mut host = StubHost::with_existing(&[]);
        host.create_status = StatusCode::UNPROCESSABLE_ENTITY;
        let mut prompter = ScriptedPrompter::new(["demo", "unused"]);

        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        let err = provisioner.name_and_create_repository(&host).await.unwrap_err();
        match err {
            RepoInitError::Provisioning(msg) => assert!(msg.starts_with("repo creation failed")),
            other => panic!("expected Provisioning, got {:?}", other),
        }
        drop(provisioner);
        assert_eq!(prompter.remaining(), 1);
    }

    #[tokio::test]
    async fn test_ignore_file_written_verbatim() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(Some(TemplateFetch::Fetched("*.pyc\n".to_string())));
        let mut prompter = ScriptedPrompter::new(["python", "Q"]);

        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        let outcome = provisioner.ignore_file().await.unwrap();
        assert_eq!(
            outcome,
            GitignoreOutcome::Written {
                topics: vec!["python".to_string()]
            }
        );

        let requested = tpl.requested.lock().unwrap().clone();
        assert_eq!(requested.len(), 1);
        assert!(requested[0].ends_with("/api/python"));
        assert_eq!(fs::read_to_string(fx.workdir.join(IGNORE_FILE)).unwrap(), "*.pyc\n");
    }

    #[tokio::test]
    async fn test_ignore_file_existing_is_kept() {
        let fx = fixture();
        fs::write(fx.workdir.join(IGNORE_FILE), "target/\n").unwrap();
        let vcs = RecordingVcs::default();
        let tpl = templates(Some(TemplateFetch::Fetched("*.pyc\n".to_string())));
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        assert_eq!(provisioner.ignore_file().await.unwrap(), GitignoreOutcome::AlreadyExists);
        assert_eq!(fs::read_to_string(fx.workdir.join(IGNORE_FILE)).unwrap(), "target/\n");
        assert!(tpl.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ignore_file_rejected_leaves_no_file() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(Some(TemplateFetch::Rejected(StatusCode::NOT_FOUND)));
        let mut prompter = ScriptedPrompter::new(["notatopic", "q"]);

        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        let outcome = provisioner.ignore_file().await.unwrap();
        assert_eq!(
            outcome,
            GitignoreOutcome::Failed {
                reason: "HTTP 404".to_string()
            }
        );
        assert!(!fx.workdir.join(IGNORE_FILE).exists());
    }

    #[tokio::test]
    async fn test_ignore_file_transport_error_is_not_fatal() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);
        let mut prompter = ScriptedPrompter::new(["rust", "q"]);

        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        let outcome = provisioner.ignore_file().await.unwrap();
        assert!(matches!(outcome, GitignoreOutcome::Failed { .. }));
        assert!(!fx.workdir.join(IGNORE_FILE).exists());
    }

    #[tokio::test]
    async fn test_ignore_file_disabled_and_declined() {
        let fx = fixture();
        let vcs = RecordingVcs::default();
        let tpl = templates(None);

        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let mut opts = options(&fx);
        opts.gitignore = false;
        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            opts,
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        assert_eq!(provisioner.ignore_file().await.unwrap(), GitignoreOutcome::Disabled);

        let mut prompter = ScriptedPrompter::new(["x"]);
        let mut provisioner = Provisioner::new(
            fx.app_dir.clone(),
            options(&fx),
            &mut prompter,
            &NoConnector,
            &vcs,
            &tpl,
        );
        assert_eq!(provisioner.ignore_file().await.unwrap(), GitignoreOutcome::Declined);
    }
}

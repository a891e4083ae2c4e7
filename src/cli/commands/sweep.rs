use crate::cli::commands::common::is_non_interactive;
use crate::cli::parser::SweepArgs;
use crate::config::{Config, MergeStrategy};
use crate::core::branch::ClassifiedBranch;
use crate::core::classifier::{classify, ClassifyPolicy};
use crate::core::deleter::{DeletionExecutor, DeletionOutcome, DeletionRequest};
use crate::core::git::{GitOperations, GitService};
use crate::ui::sweep::{
    format_age, BranchGroup, EventHandler, SweepCommand, SweepController, SweepEvent,
    SweepRenderer,
};
use crate::utils::{Result, TidyError};
use anyhow::Result as AnyhowResult;
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fmt::Write as _;
use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Applies command line overrides on top of the loaded configuration.
pub fn apply_overrides(mut config: Config, args: &SweepArgs) -> Config {
    if let Some(days) = args.days {
        config.branches.age_days = days;
    }
    if let Some(ref main) = args.main {
        config.branches.primary_branch = main.clone();
    }
    for branch in &args.protect {
        if !config.branches.protected.contains(branch) {
            config.branches.protected.push(branch.clone());
        }
    }
    if args.enhanced {
        config.branches.merge_strategy = MergeStrategy::Enhanced;
    }
    if let Some(ref remote) = args.remote {
        config.remote.name = remote.clone();
    }
    if args.no_fetch {
        config.remote.fetch_on_start = false;
    }
    config
}

/// Reads the branch facts and classifies them against `policy`.
pub fn load_branches(git: &dyn GitOperations, policy: &ClassifyPolicy) -> Result<Vec<ClassifiedBranch>> {
    let facts = git.list_local_branches()?;
    let primary_commit = git.resolve_commit_id(&policy.primary_branch).map_err(|e| {
        TidyError::git_operation(format!(
            "Primary branch '{}' could not be resolved: {}",
            policy.primary_branch,
            e.detail()
        ))
    })?;
    let merged = git.merged_ancestry_set(&primary_commit)?;
    let current = git.current_branch_name()?;

    tracing::debug!(
        branches = facts.len(),
        merged = merged.len(),
        current = %current,
        "loaded branch facts"
    );

    classify(&facts, &merged, policy, &current, git)
}

/// Local deletions for every cleanup candidate, in display order.
pub fn candidate_requests(groups: &[BranchGroup]) -> Vec<DeletionRequest> {
    groups
        .iter()
        .filter(|group| group.kind.is_selectable())
        .flat_map(|group| group.branches.iter())
        .map(|branch| {
            DeletionRequest::local(branch.name(), branch.is_merged, branch.fact.commit_id.clone())
        })
        .collect()
}

pub fn format_report(groups: &[BranchGroup], policy: &ClassifyPolicy, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🧹 git-tidy report (primary: {}, stale after {}d, strategy: {})",
        policy.primary_branch,
        policy.age_days,
        policy.merge_strategy.name()
    );
    let _ = writeln!(out, "{}", "=".repeat(50));

    for group in groups {
        let _ = writeln!(out, "\n{} ({}):", group.kind.title(), group.branches.len());
        if group.branches.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for branch in &group.branches {
            let marker = if branch.is_current { "*" } else { " " };
            let _ = writeln!(
                out,
                "  {} {:<40} {:<10} {:>6}  {:<9} {}",
                marker,
                branch.name(),
                branch.category.label(),
                format_age(&branch.fact.last_commit, now),
                branch.merge_method.name(),
                branch.fact.upstream.as_deref().unwrap_or("-")
            );
        }
    }
    out
}

pub fn format_outcomes(outcomes: &[DeletionOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        let icon = if outcome.success { "✅" } else { "❌" };
        let _ = writeln!(out, "{} {}: {}", icon, outcome.target_label(), outcome.message);
        if !outcome.success {
            let _ = writeln!(out, "   $ {}", outcome.command);
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.success).count();
    let _ = writeln!(
        out,
        "\n{} succeeded, {} failed",
        succeeded,
        outcomes.len() - succeeded
    );
    out
}

fn repository_label(service: &GitService) -> String {
    let root = &service.repository().root;
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

fn fetch_if_enabled(git: &dyn GitOperations, config: &Config) {
    if !config.remote.fetch_on_start {
        return;
    }
    let remote = config.remote_name();
    if let Err(e) = git.fetch_and_prune(remote) {
        tracing::warn!(remote, error = %e, "fetch --prune failed");
        eprintln!("⚠️  Could not fetch from '{}': {}", remote, e.detail());
    }
}

fn run_report(git: &dyn GitOperations, branches: Vec<ClassifiedBranch>, policy: &ClassifyPolicy, dry_run: bool) {
    let controller = SweepController::new(branches);
    print!("{}", format_report(controller.groups(), policy, Utc::now()));

    if dry_run {
        let requests = candidate_requests(controller.groups());
        if requests.is_empty() {
            println!("\nNothing to clean up.");
            return;
        }
        println!("\n🔍 Dry run:");
        let outcomes = DeletionExecutor::new(git).execute(&requests, true);
        print!("{}", format_outcomes(&outcomes));
    }
}

pub fn execute(config: Config, args: SweepArgs) -> Result<()> {
    args.validate()?;
    let config = apply_overrides(config, &args);
    config.validate()?;

    let service = GitService::discover()?.with_timeout(config.git_timeout());
    let label = repository_label(&service);
    let git: Arc<dyn GitOperations> = Arc::new(service);

    fetch_if_enabled(git.as_ref(), &config);

    let policy = ClassifyPolicy::from_config(&config);
    let branches = load_branches(git.as_ref(), &policy)?;

    if args.report || is_non_interactive() {
        run_report(git.as_ref(), branches, &policy, args.dry_run);
        return Ok(());
    }

    let renderer = SweepRenderer::new(label, policy.age_days, args.dry_run);
    let mut app = App::new(SweepController::new(branches), renderer, git, args.dry_run);
    app.run()
        .map_err(|e| TidyError::Io(io::Error::other(format!("Terminal UI error: {}", e))))?;

    let outcomes = app.outcomes();
    if !outcomes.is_empty() {
        print!("{}", format_outcomes(outcomes));
    }
    Ok(())
}

pub struct App {
    controller: SweepController,
    renderer: SweepRenderer,
    events: EventHandler,
    git: Arc<dyn GitOperations>,
    dry_run: bool,
    pending: Option<Receiver<Vec<DeletionOutcome>>>,
    tick: usize,
}

impl App {
    pub fn new(
        controller: SweepController,
        renderer: SweepRenderer,
        git: Arc<dyn GitOperations>,
        dry_run: bool,
    ) -> Self {
        Self {
            controller,
            renderer,
            events: EventHandler::new(),
            git,
            dry_run,
            pending: None,
            tick: 0,
        }
    }

    pub fn outcomes(&self) -> &[DeletionOutcome] {
        self.controller.outcomes()
    }

    pub fn run(&mut self) -> AnyhowResult<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AnyhowResult<()> {
        terminal.draw(|f| self.renderer.render(f, &self.controller, self.tick))?;

        loop {
            self.collect_results();
            if self.controller.should_quit() {
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(event) = self.events.handle_key_event(key, self.controller.mode()) {
                        self.dispatch(event);
                    }
                }
            }

            if self.controller.should_quit() {
                break;
            }

            self.tick = self.tick.wrapping_add(1);
            terminal.draw(|f| self.renderer.render(f, &self.controller, self.tick))?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: SweepEvent) {
        if let Some(SweepCommand::Execute(batch)) = self.controller.handle(event) {
            self.spawn_execution(batch);
        }
    }

    fn spawn_execution(&mut self, batch: Vec<DeletionRequest>) {
        let (tx, rx) = mpsc::channel();
        let git = Arc::clone(&self.git);
        let dry_run = self.dry_run;

        thread::spawn(move || {
            let outcomes = DeletionExecutor::new(git.as_ref()).execute(&batch, dry_run);
            let _ = tx.send(outcomes);
        });

        self.pending = Some(rx);
    }

    fn collect_results(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };

        let outcomes = match rx.try_recv() {
            Ok(outcomes) => outcomes,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("deletion worker exited without reporting results");
                Vec::new()
            }
        };

        self.pending = None;
        self.dispatch(SweepEvent::ExecutionFinished(outcomes));
    }

    /// Blocks until the in-flight batch reports back, without a terminal.
    #[cfg(test)]
    fn wait_for_results(&mut self) {
        while self.pending.is_some() {
            self.collect_results();
            thread::sleep(Duration::from_millis(5));
        }
    }
}

//! Selection/confirmation state machine for the sweep UI.
//!
//! Pure `(state, event) -> (state, command)`: no terminal, no git. The
//! caller runs whatever `SweepCommand` comes back and reports the result
//! through `SweepEvent::ExecutionFinished`.

use crate::core::branch::ClassifiedBranch;
use crate::core::deleter::{DeletionOutcome, DeletionRequest, TargetKind};
use crate::ui::sweep::state::{CursorState, SelectionState};
use crate::ui::sweep::types::{BranchGroup, GroupKind, SweepMode};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    Up,
    Down,
    ToggleLocal,
    ToggleRemote,
    Confirm,
    Accept,
    Reject,
    Quit,
    Dismiss,
    ExecutionFinished(Vec<DeletionOutcome>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SweepCommand {
    Execute(Vec<DeletionRequest>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DisplayEntry {
    group: usize,
    index: usize,
}

pub struct SweepController {
    groups: Vec<BranchGroup>,
    display: Vec<DisplayEntry>,
    cursor: CursorState,
    selection: SelectionState,
    mode: SweepMode,
    outcomes: Vec<DeletionOutcome>,
    should_quit: bool,
    quit_after_execution: bool,
}

impl SweepController {
    pub fn new(branches: Vec<ClassifiedBranch>) -> Self {
        let mut groups: Vec<BranchGroup> = GroupKind::ORDER
            .iter()
            .map(|kind| BranchGroup {
                kind: *kind,
                branches: Vec::new(),
            })
            .collect();

        for branch in branches {
            let kind = GroupKind::of(branch.category);
            if let Some(group) = groups.iter_mut().find(|g| g.kind == kind) {
                group.branches.push(branch);
            }
        }

        let display = groups
            .iter()
            .enumerate()
            .flat_map(|(group, g)| (0..g.branches.len()).map(move |index| DisplayEntry { group, index }))
            .collect();

        Self {
            groups,
            display,
            cursor: CursorState::default(),
            selection: SelectionState::new(),
            mode: SweepMode::Selecting,
            outcomes: Vec::new(),
            should_quit: false,
            quit_after_execution: false,
        }
    }

    pub fn handle(&mut self, event: SweepEvent) -> Option<SweepCommand> {
        match self.mode {
            SweepMode::Selecting => self.handle_selecting(event),
            SweepMode::Confirming => self.handle_confirming(event),
            SweepMode::Executing => {
                self.handle_executing(event);
                None
            }
            SweepMode::Reporting => {
                if !matches!(event, SweepEvent::ExecutionFinished(_)) {
                    self.should_quit = true;
                }
                None
            }
        }
    }

    fn handle_selecting(&mut self, event: SweepEvent) -> Option<SweepCommand> {
        match event {
            SweepEvent::Up => self.cursor.previous_item(),
            SweepEvent::Down => self.cursor.next_item(self.display.len()),
            SweepEvent::ToggleLocal => self.toggle_local(),
            SweepEvent::ToggleRemote => self.toggle_remote(),
            SweepEvent::Confirm => {
                if !self.selection.is_empty() {
                    self.mode = SweepMode::Confirming;
                }
            }
            SweepEvent::Quit => self.should_quit = true,
            _ => {}
        }
        None
    }

    fn handle_confirming(&mut self, event: SweepEvent) -> Option<SweepCommand> {
        match event {
            SweepEvent::Accept => {
                let batch = self.pending_batch();
                tracing::info!(requests = batch.len(), "deletion batch confirmed");
                self.mode = SweepMode::Executing;
                Some(SweepCommand::Execute(batch))
            }
            SweepEvent::Reject => {
                self.mode = SweepMode::Selecting;
                None
            }
            SweepEvent::Quit => {
                self.should_quit = true;
                None
            }
            _ => None,
        }
    }

    fn handle_executing(&mut self, event: SweepEvent) {
        match event {
            SweepEvent::ExecutionFinished(outcomes) => {
                self.outcomes = outcomes;
                self.mode = SweepMode::Reporting;
                if self.quit_after_execution {
                    self.should_quit = true;
                }
            }
            // the batch is already running; leave once it reports back
            SweepEvent::Quit => self.quit_after_execution = true,
            _ => {}
        }
    }

    fn toggle_local(&mut self) {
        if let Some(name) = self.selectable_name_at_cursor() {
            self.selection.toggle_local(&name);
        }
    }

    fn toggle_remote(&mut self) {
        let Some(branch) = self.selected_branch() else {
            return;
        };
        if !branch.category.is_selectable() || !branch.fact.has_remote() {
            return;
        }
        let name = branch.name().to_string();
        self.selection.toggle_remote(&name);
    }

    fn selectable_name_at_cursor(&self) -> Option<String> {
        self.selected_branch()
            .filter(|b| b.category.is_selectable())
            .map(|b| b.name().to_string())
    }

    fn branch_at(&self, index: usize) -> Option<&ClassifiedBranch> {
        let entry = self.display.get(index)?;
        self.groups.get(entry.group)?.branches.get(entry.index)
    }

    /// The requests Accept would emit right now, in display order with
    /// each branch's local deletion ahead of its remote one.
    pub fn pending_batch(&self) -> Vec<DeletionRequest> {
        let mut seen: HashSet<(String, TargetKind)> = HashSet::new();
        let mut batch = Vec::new();

        for branch in (0..self.display.len()).filter_map(|i| self.branch_at(i)) {
            let name = branch.name();
            if !branch.category.is_selectable() || !self.selection.is_local_selected(name) {
                continue;
            }

            if seen.insert((name.to_string(), TargetKind::Local)) {
                batch.push(DeletionRequest::local(
                    name,
                    branch.is_merged,
                    branch.fact.commit_id.clone(),
                ));
            }

            if self.selection.is_remote_selected(name)
                && seen.insert((name.to_string(), TargetKind::Remote))
            {
                batch.push(DeletionRequest::remote(
                    branch.fact.remote_branch_name(),
                    branch.fact.remote.clone().unwrap_or_default(),
                    branch.is_merged,
                    branch.fact.commit_id.clone(),
                ));
            }
        }
        batch
    }

    pub fn mode(&self) -> SweepMode {
        self.mode
    }

    pub fn groups(&self) -> &[BranchGroup] {
        &self.groups
    }

    pub fn display_len(&self) -> usize {
        self.display.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    pub fn selected_branch(&self) -> Option<&ClassifiedBranch> {
        self.branch_at(self.cursor.index())
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn outcomes(&self) -> &[DeletionOutcome] {
        &self.outcomes
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_selectable_at(&self, index: usize) -> bool {
        self.branch_at(index)
            .map(|b| b.category.is_selectable())
            .unwrap_or(false)
    }

    /// Display position of the first branch in `kind`, if it has any.
    pub fn group_offset(&self, kind: GroupKind) -> Option<usize> {
        self.display
            .iter()
            .position(|entry| self.groups.get(entry.group).map(|g| g.kind) == Some(kind))
    }

    pub fn branch_at_display(&self, index: usize) -> Option<&ClassifiedBranch> {
        self.branch_at(index)
    }
}

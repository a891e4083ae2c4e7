use crate::core::branch::{short_commit, ClassifiedBranch};
use crate::core::deleter::DeletionOutcome;
use crate::ui::sweep::controller::SweepController;
use crate::ui::sweep::types::{category_color, dimmed_text_color, GroupKind, SweepMode};
use crate::ui::sweep::utils::{centered_rect, format_age, truncate};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const BRANCH_WIDTH: usize = 40;

fn key_style() -> Style {
    Style::default()
        .fg(Color::Rgb(99, 102, 241))
        .add_modifier(Modifier::BOLD)
}

/// Selection marks for a row: local then remote.
fn selection_marks(controller: &SweepController, branch: &ClassifiedBranch) -> String {
    if !branch.category.is_selectable() {
        return "      ".to_string();
    }
    let selection = controller.selection();
    let local = if selection.is_local_selected(branch.name()) { "[x]" } else { "[ ]" };
    let remote = if !branch.fact.has_remote() {
        "   "
    } else if selection.is_remote_selected(branch.name()) {
        "[R]"
    } else {
        "[ ]"
    };
    format!("{}{}", local, remote)
}

/// Table row holding the cursor, accounting for one title row per
/// non-empty group.
fn cursor_row(controller: &SweepController) -> Option<usize> {
    if controller.display_len() == 0 {
        return None;
    }
    let cursor = controller.cursor();
    let titles_before = GroupKind::ORDER
        .iter()
        .filter_map(|kind| controller.group_offset(*kind))
        .filter(|offset| *offset <= cursor)
        .count();
    Some(cursor + titles_before)
}

pub struct SweepRenderer {
    repository: String,
    age_days: u32,
    dry_run: bool,
}

impl SweepRenderer {
    pub fn new(repository: impl Into<String>, age_days: u32, dry_run: bool) -> Self {
        Self {
            repository: repository.into(),
            age_days,
            dry_run,
        }
    }

    pub fn render(&self, f: &mut Frame, controller: &SweepController, tick: usize) {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .margin(1)
            .split(f.area());

        self.render_header(f, main_layout[0]);
        match controller.mode() {
            SweepMode::Reporting => self.render_report(f, main_layout[1], controller.outcomes()),
            _ => self.render_table(f, main_layout[1], controller),
        }
        self.render_footer(f, main_layout[2], controller, tick);

        match controller.mode() {
            SweepMode::Confirming => self.render_confirm_dialog(f, controller),
            SweepMode::Executing => self.render_busy(f, tick),
            _ => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let mut title = vec![
            Span::styled(
                "git-tidy - Branch Cleanup",
                Style::default()
                    .fg(Color::Rgb(255, 255, 255))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled(
                format!("{} • stale after {}d", self.repository, self.age_days),
                Style::default().fg(Color::Rgb(156, 163, 175)),
            ),
        ];
        if self.dry_run {
            title.push(Span::raw("    "));
            title.push(Span::styled(
                "[DRY RUN]",
                Style::default()
                    .fg(Color::Rgb(245, 158, 11))
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let header = Paragraph::new(vec![
            Line::from(title),
            Line::from("─".repeat(area.width as usize)),
        ])
        .style(Style::default().fg(Color::Rgb(75, 85, 99)))
        .alignment(Alignment::Left);

        f.render_widget(header, area);
    }

    fn render_table(&self, f: &mut Frame, area: Rect, controller: &SweepController) {
        let now = Utc::now();
        let header = Row::new(vec![
            Cell::from("Sel"),
            Cell::from("Branch"),
            Cell::from("Category"),
            Cell::from("Age"),
            Cell::from("Merge"),
            Cell::from("Upstream"),
        ])
        .style(
            Style::default()
                .fg(Color::Rgb(156, 163, 175))
                .add_modifier(Modifier::BOLD),
        )
        .height(1);

        let mut rows = Vec::new();
        for group in controller.groups().iter().filter(|g| !g.branches.is_empty()) {
            rows.push(self.create_group_row(group.kind, group.branches.len()));
            for branch in &group.branches {
                rows.push(self.create_branch_row(controller, branch, now));
            }
        }

        let widths = [
            Constraint::Length(7),
            Constraint::Min(30),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Min(24),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .highlight_style(
                Style::default()
                    .bg(Color::Rgb(30, 41, 59))
                    .fg(Color::Rgb(255, 255, 255)),
            )
            .highlight_symbol("▶ ");

        let mut table_state = TableState::default().with_selected(cursor_row(controller));
        f.render_stateful_widget(table, area, &mut table_state);
    }

    fn create_group_row(&self, kind: GroupKind, count: usize) -> Row<'static> {
        Row::new(vec![Cell::from(""), Cell::from(format!("{} ({})", kind.title(), count))])
            .style(
                Style::default()
                    .fg(Color::Rgb(156, 163, 175))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .height(1)
    }

    fn create_branch_row(
        &self,
        controller: &SweepController,
        branch: &ClassifiedBranch,
        now: DateTime<Utc>,
    ) -> Row<'static> {
        let base_style = if branch.category.is_selectable() {
            Style::default().fg(Color::Rgb(229, 231, 235))
        } else {
            Style::default().fg(dimmed_text_color())
        };

        let name = if branch.is_current {
            format!("{} *", truncate(branch.name(), BRANCH_WIDTH - 2))
        } else {
            truncate(branch.name(), BRANCH_WIDTH)
        };

        Row::new(vec![
            Cell::from(selection_marks(controller, branch)).style(base_style),
            Cell::from(name).style(base_style.add_modifier(Modifier::BOLD)),
            Cell::from(branch.category.label())
                .style(Style::default().fg(category_color(branch.category))),
            Cell::from(format_age(&branch.fact.last_commit, now)).style(base_style),
            Cell::from(branch.merge_method.name()).style(base_style),
            Cell::from(branch.fact.upstream.clone().unwrap_or_else(|| "-".to_string()))
                .style(base_style),
        ])
        .height(1)
    }

    fn render_footer(&self, f: &mut Frame, area: Rect, controller: &SweepController, tick: usize) {
        let selection = controller.selection();
        let counts = format!(
            "{} local • {} remote selected • ",
            selection.local_count(),
            selection.remote_count()
        );

        let controls = match controller.mode() {
            SweepMode::Selecting | SweepMode::Confirming => Line::from(vec![
                Span::styled(counts, Style::default().fg(Color::Rgb(156, 163, 175))),
                Span::styled("[Space]", key_style()),
                Span::raw(" Local • "),
                Span::styled("[r]", key_style()),
                Span::raw(" Remote • "),
                Span::styled("[Enter]", key_style()),
                Span::raw(" Delete • "),
                Span::styled("[q]", key_style()),
                Span::raw(" Quit"),
            ]),
            SweepMode::Executing => Line::from(vec![
                Span::styled(
                    format!("{} Deleting branches...", SPINNER[tick % SPINNER.len()]),
                    Style::default().fg(Color::Rgb(245, 158, 11)),
                ),
            ]),
            SweepMode::Reporting => Line::from(vec![
                Span::styled("[any key]", key_style()),
                Span::raw(" Exit"),
            ]),
        };

        let footer = Paragraph::new(vec![controls])
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::Rgb(75, 85, 99))),
            )
            .alignment(Alignment::Left);

        f.render_widget(footer, area);
    }

    fn render_confirm_dialog(&self, f: &mut Frame, controller: &SweepController) {
        let area = centered_rect(70, 50, f.area());
        f.render_widget(Clear, area);

        let batch = controller.pending_batch();
        let mut lines = vec![
            Line::from(format!("Delete {} item(s)?", batch.len())),
            Line::from(""),
        ];
        for request in &batch {
            lines.push(Line::from(Span::styled(
                format!("  {}", request.command()),
                Style::default().fg(Color::Rgb(229, 231, 235)),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Rgb(34, 197, 94))),
            Span::raw(" confirm • "),
            Span::styled("[n]", Style::default().fg(Color::Rgb(239, 68, 68))),
            Span::raw(" back"),
        ]));

        let title = if self.dry_run {
            " Confirm Deletion (dry run) "
        } else {
            " Confirm Deletion "
        };

        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(239, 68, 68)))
                    .style(Style::default().bg(Color::Rgb(0, 0, 0))),
            )
            .style(Style::default().fg(Color::Rgb(255, 255, 255)))
            .wrap(Wrap { trim: false });

        f.render_widget(dialog, area);
    }

    fn render_busy(&self, f: &mut Frame, tick: usize) {
        let area = centered_rect(40, 20, f.area());
        f.render_widget(Clear, area);

        let busy = Paragraph::new(vec![
            Line::from(""),
            Line::from(format!("{} Working...", SPINNER[tick % SPINNER.len()])),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(99, 102, 241)))
                .style(Style::default().bg(Color::Rgb(0, 0, 0))),
        )
        .alignment(Alignment::Center);

        f.render_widget(busy, area);
    }

    fn render_report(&self, f: &mut Frame, area: Rect, outcomes: &[DeletionOutcome]) {
        let mut lines = Vec::new();
        if outcomes.is_empty() {
            lines.push(Line::from("Nothing was deleted."));
        }

        for outcome in outcomes {
            let (icon, color) = if outcome.success {
                ("✓", Color::Rgb(34, 197, 94))
            } else {
                ("✗", Color::Rgb(239, 68, 68))
            };

            let mut heading = vec![
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::styled(
                    outcome.target_label(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({})", outcome.target.name()),
                    Style::default().fg(dimmed_text_color()),
                ),
            ];
            if !outcome.commit_id.is_empty() {
                heading.push(Span::styled(
                    format!("  was {}", short_commit(&outcome.commit_id)),
                    Style::default().fg(Color::Rgb(245, 158, 11)),
                ));
            }

            lines.push(Line::from(heading));
            lines.push(Line::from(Span::raw(format!("    {}", outcome.message))));
            lines.push(Line::from(Span::styled(
                format!("    $ {}", outcome.command),
                Style::default().fg(dimmed_text_color()),
            )));
        }

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        let report = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" Results: {}/{} succeeded ", succeeded, outcomes.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(75, 85, 99))),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(report, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::branch::Category;
    use crate::core::deleter::{DeletionExecutor, DeletionRequest};
    use crate::test_utils::mock_git::MockGit;
    use crate::test_utils::test_helpers::{branch_fact, classified, local_branch_fact};
    use crate::ui::sweep::controller::SweepEvent;
    use ratatui::{backend::TestBackend, Terminal};

    fn controller() -> SweepController {
        let now = Utc::now();
        SweepController::new(vec![
            classified(branch_fact("main", now, 0), Category::Protected),
            classified(branch_fact("feat/old-merged", now, 120), Category::MergedOld),
            classified(local_branch_fact("feat/old-unmerged", now, 120), Category::UnmergedOld),
            classified(branch_fact("feat/fresh", now, 5), Category::Active),
        ])
    }

    fn draw(renderer: &SweepRenderer, controller: &SweepController) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| renderer.render(f, controller, 0))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_selection_marks() {
        let mut controller = controller();
        let merged = controller.branch_at_display(1).unwrap().clone();
        let unmerged = controller.branch_at_display(2).unwrap().clone();
        let main = controller.branch_at_display(0).unwrap().clone();

        assert_eq!(selection_marks(&controller, &main), "      ");
        assert_eq!(selection_marks(&controller, &merged), "[ ][ ]");
        assert_eq!(selection_marks(&controller, &unmerged), "[ ]   ");

        controller.handle(SweepEvent::Down);
        controller.handle(SweepEvent::ToggleLocal);
        controller.handle(SweepEvent::ToggleRemote);
        assert_eq!(selection_marks(&controller, &merged), "[x][R]");
    }

    #[test]
    fn test_cursor_row_skips_group_titles() {
        let mut controller = controller();
        assert_eq!(cursor_row(&controller), Some(1));

        controller.handle(SweepEvent::Down);
        assert_eq!(cursor_row(&controller), Some(3));

        controller.handle(SweepEvent::Down);
        controller.handle(SweepEvent::Down);
        assert_eq!(cursor_row(&controller), Some(6));

        assert_eq!(cursor_row(&SweepController::new(Vec::new())), None);
    }

    #[test]
    fn test_render_selecting_view() {
        let renderer = SweepRenderer::new("demo", 90, true);
        let screen = draw(&renderer, &controller());

        assert!(screen.contains("git-tidy - Branch Cleanup"));
        assert!(screen.contains("stale after 90d"));
        assert!(screen.contains("[DRY RUN]"));
        assert!(screen.contains("Cleanup Candidates (2)"));
        assert!(screen.contains("feat/old-merged"));
        assert!(screen.contains("origin/feat/fresh"));
        assert!(screen.contains("0 local"));
    }

    #[test]
    fn test_render_confirm_dialog_lists_batch() {
        let renderer = SweepRenderer::new("demo", 90, false);
        let mut controller = controller();
        controller.handle(SweepEvent::Down);
        controller.handle(SweepEvent::ToggleLocal);
        controller.handle(SweepEvent::ToggleRemote);
        controller.handle(SweepEvent::Confirm);

        let screen = draw(&renderer, &controller);
        assert!(screen.contains("Delete 2 item(s)?"));
        assert!(screen.contains("git branch -d feat/old-merged"));
        assert!(screen.contains("git push origin --delete feat/old-merged"));
    }

    #[test]
    fn test_render_report_shows_commit_hint() {
        let renderer = SweepRenderer::new("demo", 90, false);
        let mut controller = controller();
        controller.handle(SweepEvent::Down);
        controller.handle(SweepEvent::ToggleLocal);
        controller.handle(SweepEvent::Confirm);
        controller.handle(SweepEvent::Accept);

        let git = MockGit::new();
        let request = DeletionRequest::local("feat/old-merged", true, "abcdef0123456789");
        let outcomes = DeletionExecutor::new(&git).execute(&[request], false);
        controller.handle(SweepEvent::ExecutionFinished(outcomes));

        let screen = draw(&renderer, &controller);
        assert!(screen.contains("Results: 1/1 succeeded"));
        assert!(screen.contains("was abcdef0"));
        assert!(screen.contains("$ git branch -d feat/old-merged"));
    }
}

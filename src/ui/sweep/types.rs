use crate::core::branch::{Category, ClassifiedBranch};
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    Selecting,
    Confirming,
    Executing,
    Reporting,
}

impl SweepMode {
    pub fn name(&self) -> &str {
        match self {
            SweepMode::Selecting => "Selecting",
            SweepMode::Confirming => "Confirming",
            SweepMode::Executing => "Executing",
            SweepMode::Reporting => "Reporting",
        }
    }
}

/// The three fixed display sections, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Protected,
    Candidates,
    Active,
}

impl GroupKind {
    pub const ORDER: [GroupKind; 3] = [GroupKind::Protected, GroupKind::Candidates, GroupKind::Active];

    pub fn of(category: Category) -> Self {
        match category {
            Category::Protected => GroupKind::Protected,
            Category::MergedOld | Category::UnmergedOld => GroupKind::Candidates,
            Category::Active => GroupKind::Active,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            GroupKind::Protected => "Protected / Current",
            GroupKind::Candidates => "Cleanup Candidates",
            GroupKind::Active => "Active",
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, GroupKind::Candidates)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchGroup {
    pub kind: GroupKind,
    pub branches: Vec<ClassifiedBranch>,
}

pub fn category_color(category: Category) -> Color {
    match category {
        Category::Protected => Color::Rgb(99, 102, 241),  // Indigo
        Category::Active => Color::Rgb(34, 197, 94),      // Green
        Category::MergedOld => Color::Rgb(245, 158, 11),  // Amber
        Category::UnmergedOld => Color::Rgb(239, 68, 68), // Red
    }
}

pub fn dimmed_text_color() -> Color {
    Color::Rgb(107, 114, 128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_of_category() {
        assert_eq!(GroupKind::of(Category::Protected), GroupKind::Protected);
        assert_eq!(GroupKind::of(Category::MergedOld), GroupKind::Candidates);
        assert_eq!(GroupKind::of(Category::UnmergedOld), GroupKind::Candidates);
        assert_eq!(GroupKind::of(Category::Active), GroupKind::Active);
    }

    #[test]
    fn test_only_candidates_are_selectable() {
        assert!(!GroupKind::Protected.is_selectable());
        assert!(GroupKind::Candidates.is_selectable());
        assert!(!GroupKind::Active.is_selectable());
    }

    #[test]
    fn test_category_color() {
        assert_eq!(category_color(Category::Active), Color::Rgb(34, 197, 94));
        assert_eq!(category_color(Category::UnmergedOld), Color::Rgb(239, 68, 68));
    }
}

//! Choices offered for a path and the actions they resolve to

use std::fmt;

/// One entry of the per-path menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Assign this single category (single-category mode).
    Category(String),
    /// Open a multi-select over all categories (multi-category mode).
    PickCategories,
    Skip,
    StepInto,
    StepOut,
    Exit,
}

impl Choice {
    pub fn label(&self) -> String {
        match self {
            Self::Category(name) => format!("Category \"{}\"", name),
            Self::PickCategories => "Choose categories".to_string(),
            Self::Skip => "Skip".to_string(),
            Self::StepInto => "Step-into".to_string(),
            Self::StepOut => "Step-out".to_string(),
            Self::Exit => "Exit".to_string(),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// What the walk does with the current path once the user has answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Skip,
    StepInto,
    StepOut,
    CategorySelected(Vec<String>),
    Exit,
}

/// Build the menu for one path.
///
/// Categories come first, then Skip, Step-into (when allowed), Step-out (when
/// inside a stepped-into directory) and Exit.
pub(crate) fn build_choices(
    categories: &[String],
    multi_category: bool,
    can_step_into: bool,
    can_step_out: bool,
) -> Vec<Choice> {
    let mut choices = if multi_category {
        vec![Choice::PickCategories]
    } else {
        categories.iter().cloned().map(Choice::Category).collect()
    };
    choices.push(Choice::Skip);
    if can_step_into {
        choices.push(Choice::StepInto);
    }
    if can_step_out {
        choices.push(Choice::StepOut);
    }
    choices.push(Choice::Exit);
    choices
}

//! The eight graph operations a user can trigger on the selected node

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateSubBranch,
    Expand,
    DeleteChildren,
    DeleteExtension,
    DeleteNode,
    Fold,
    Unfold,
    Collapse,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::CreateSubBranch,
        Action::Expand,
        Action::DeleteChildren,
        Action::DeleteExtension,
        Action::DeleteNode,
        Action::Fold,
        Action::Unfold,
        Action::Collapse,
    ];

    /// Kebab-case name used in scripts.
    pub fn name(self) -> &'static str {
        match self {
            Action::CreateSubBranch => "create-sub-branch",
            Action::Expand => "expand",
            Action::DeleteChildren => "delete-children",
            Action::DeleteExtension => "delete-extension",
            Action::DeleteNode => "delete-node",
            Action::Fold => "fold",
            Action::Unfold => "unfold",
            Action::Collapse => "collapse",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_every_action_when_parsing_its_name_then_returns_itself() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn given_unknown_name_when_parsing_then_errors() {
        assert!("explode".parse::<Action>().is_err());
    }
}

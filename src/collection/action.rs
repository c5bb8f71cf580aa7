use std::fmt;
use std::str::FromStr;

/// What a generated control does when activated
///
/// The action is stored on the control itself as the `data-entry-action`
/// attribute, so the document alone tells which buttons belong to the
/// collection machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryAction {
    Add,
    Remove,
}

impl EntryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryAction::Add => "add",
            EntryAction::Remove => "remove",
        }
    }
}

impl fmt::Display for EntryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(EntryAction::Add),
            "remove" => Ok(EntryAction::Remove),
            other => Err(format!("unknown entry action '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_values() {
        assert_eq!("add".parse::<EntryAction>(), Ok(EntryAction::Add));
        assert_eq!("remove".parse::<EntryAction>(), Ok(EntryAction::Remove));
        assert_eq!(EntryAction::Remove.to_string(), "remove");
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert!("Add".parse::<EntryAction>().is_err());
        assert!("".parse::<EntryAction>().is_err());
    }
}

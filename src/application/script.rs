//! Plain-text action scripts that drive an [`Editor`] line by line
//!
//! ```text
//! # comments and blank lines are ignored
//! select 2
//! create-sub-branch
//! click 60 0
//! expand
//! ```

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::application::{Action, ApplicationError, ApplicationResult, Editor, IoResultExt};
use crate::domain::{NodeId, Point};

/// Script exercising every operation, used by `branchtree demo`.
pub const DEMO_SCRIPT: &str = "\
# grow a side branch off the middle node and extend it twice
select 2
create-sub-branch
select 4
expand
expand
# a second side branch lower down is placed right of the first
select 1
create-sub-branch
# nested branch on the side branch
select 5
create-sub-branch
# hide and reveal
select 2
fold
unfold
select 4
collapse
unfold
select 5
unfold
# prune
delete-extension
select 1
delete-children
";

/// One script instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Reset,
    Select(NodeId),
    Deselect,
    Click(Point),
    Run(Action),
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or("empty command")?;
        let args: Vec<&str> = words.collect();

        let command = match name {
            "reset" => Command::Reset,
            "deselect" => Command::Deselect,
            "select" => {
                let [id] = args.as_slice() else {
                    return Err("select takes exactly one node id".into());
                };
                let id = id.trim_start_matches('#');
                let id = id
                    .parse::<u64>()
                    .map_err(|_| format!("invalid node id: {id}"))?;
                return Ok(Command::Select(NodeId(id)));
            }
            "click" => {
                let [x, y] = args.as_slice() else {
                    return Err("click takes x and y".into());
                };
                let x = parse_coord(x)?;
                let y = parse_coord(y)?;
                return Ok(Command::Click(Point::new(x, y)));
            }
            other => Command::Run(other.parse::<Action>()?),
        };
        if !args.is_empty() {
            return Err(format!("{name} takes no arguments"));
        }
        Ok(command)
    }
}

fn parse_coord(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid coordinate: {raw}"))
}

/// What happened while running a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Operations whose preconditions held
    pub applied: usize,
    /// Operations that were no-ops
    pub skipped: usize,
}

/// Parsed script: commands with their 1-based line numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    commands: Vec<(usize, Command)>,
}

impl Script {
    pub fn parse(source: &str) -> ApplicationResult<Self> {
        let mut commands = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let command = line
                .parse::<Command>()
                .map_err(|message| ApplicationError::script(idx + 1, message))?;
            commands.push((idx + 1, command));
        }
        Ok(Self { commands })
    }

    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let source = std::fs::read_to_string(path).with_path_context("read script", path)?;
        Self::parse(&source)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs every command against `editor`, stopping at the first unknown node id.
    #[instrument(level = "debug", skip_all)]
    pub fn run(&self, editor: &mut Editor) -> ApplicationResult<ScriptReport> {
        let mut report = ScriptReport::default();
        for (line, command) in &self.commands {
            match command {
                Command::Reset => editor.reset(),
                Command::Deselect => editor.deselect(),
                Command::Click(point) => {
                    let hit = editor.select_at(*point);
                    debug!("line {}: click hit {:?}", line, hit);
                }
                Command::Select(id) => {
                    let key = editor
                        .store()
                        .resolve_node(*id)
                        .map_err(|e| ApplicationError::script(*line, e.to_string()))?;
                    if !editor.select(key) {
                        debug!("line {}: node {} is hidden", line, id);
                        editor.deselect();
                    }
                }
                Command::Run(action) => {
                    if editor.apply(*action) {
                        report.applied += 1;
                    } else {
                        debug!("line {}: {} not applicable", line, action);
                        report.skipped += 1;
                    }
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("reset", Command::Reset)]
    #[case("select 3", Command::Select(NodeId(3)))]
    #[case("select #7", Command::Select(NodeId(7)))]
    #[case("click 60 -12.5", Command::Click(Point::new(60.0, -12.5)))]
    #[case("  fold  ", Command::Run(Action::Fold))]
    #[case("delete-node", Command::Run(Action::DeleteNode))]
    fn given_valid_line_when_parsing_then_returns_command(
        #[case] line: &str,
        #[case] expected: Command,
    ) {
        assert_eq!(line.parse::<Command>(), Ok(expected));
    }

    #[rstest]
    #[case("select")]
    #[case("select x")]
    #[case("select 1 2")]
    #[case("click 1")]
    #[case("click 1 nan")]
    #[case("fold 3")]
    #[case("teleport")]
    fn given_invalid_line_when_parsing_then_errors(#[case] line: &str) {
        assert!(line.parse::<Command>().is_err());
    }

    #[test]
    fn given_bad_line_when_parsing_script_then_reports_line_number() {
        let err = Script::parse("# header\n\nselect 2\nwobble\n").unwrap_err();
        match err {
            ApplicationError::Script { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("wobble"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn given_demo_script_when_run_then_every_operation_applies() {
        let script = Script::parse(DEMO_SCRIPT).expect("demo parses");
        let mut editor = Editor::default();

        let report = script.run(&mut editor).expect("demo runs");

        assert_eq!(report.skipped, 0);
        assert_eq!(report.applied, 12);
    }

    #[test]
    fn given_unknown_node_when_running_then_errors_with_line() {
        let script = Script::parse("select 99\n").unwrap();
        let mut editor = Editor::default();

        let err = script.run(&mut editor).unwrap_err();

        assert!(err.to_string().starts_with("script line 1:"));
    }
}

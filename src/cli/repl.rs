//! Line-oriented interactive session.
//!
//! Each input line is one user action; output goes to a writer so the loop
//! can be driven from tests.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::application::{describe, Action, ApplicationError, Event, Session, TreeId};
use crate::cli::{CliError, CliResult};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SelectionItem;
use crate::infrastructure::{InfraError, Renderer as _};

const HELP: &str = "\
commands:
  <N> | start <N>   start a number (same number again adds a tree)
  add               add a tree for the current number
  click <T> <K>     click node #K of tree T
  pick <I>          apply choice I of the last opened popup
  show              draw all trees
  svg <FILE> [T]    write tree T (default 0) as SVG
  reset             clear all trees
  learn             about the fundamental theorem
  help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Action(Action),
    Click { tree: TreeId, ordinal: usize },
    Pick(usize),
    Show,
    Svg { path: PathBuf, tree: TreeId },
    Help,
    Quit,
    Empty,
}

/// Parses one input line; a bare token submits it as raw input.
pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let number = |s: &str| s.parse::<usize>().map_err(|_| format!("not a number: {s}"));
    let cmd = match words.as_slice() {
        [] => ReplCommand::Empty,
        ["start", rest @ ..] => ReplCommand::Action(Action::Start(rest.join(" "))),
        ["add"] => ReplCommand::Action(Action::AddTree),
        ["reset"] => ReplCommand::Action(Action::Reset),
        ["learn"] => ReplCommand::Action(Action::LearnMore),
        ["click", t, k] => ReplCommand::Click {
            tree: number(t)?,
            ordinal: number(k)?,
        },
        ["pick", i] => ReplCommand::Pick(number(i)?),
        ["show"] => ReplCommand::Show,
        ["svg", path] => ReplCommand::Svg {
            path: PathBuf::from(path),
            tree: 0,
        },
        ["svg", path, t] => ReplCommand::Svg {
            path: PathBuf::from(path),
            tree: number(t)?,
        },
        ["help"] | ["?"] => ReplCommand::Help,
        ["quit"] | ["exit"] | ["q"] => ReplCommand::Quit,
        [raw] => ReplCommand::Action(Action::Start(raw.to_string())),
        _ => return Err(format!("unknown command: {line}, try help")),
    };
    Ok(cmd)
}

pub struct Repl<'a> {
    container: &'a ServiceContainer,
    session: Session,
    fuzzy: bool,
    /// Tree of the most recently opened popup
    last_tree: Option<TreeId>,
}

impl<'a> Repl<'a> {
    pub fn new(container: &'a ServiceContainer, fuzzy: bool) -> Self {
        Self {
            container,
            session: container.session(),
            fuzzy,
            last_tree: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Submits raw input as if typed at the prompt.
    pub fn submit<W: Write>(&mut self, raw: &str, out: &mut W) -> CliResult<()> {
        self.handle(ReplCommand::Action(Action::Start(raw.to_string())), out)
            .map(|_| ())
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> CliResult<()> {
        writeln!(out, "{}", self.session.message()).map_err(io_err)?;
        for line in input.lines() {
            let line = line.map_err(|e| InfraError::io("read input", e))?;
            let cmd = match parse_line(&line) {
                Ok(cmd) => cmd,
                Err(msg) => {
                    writeln!(out, "error: {msg}").map_err(io_err)?;
                    continue;
                }
            };
            if !self.handle(cmd, out)? {
                break;
            }
        }
        Ok(())
    }

    /// Returns false when the loop should stop.
    #[instrument(level = "debug", skip(self, out))]
    fn handle<W: Write>(&mut self, cmd: ReplCommand, out: &mut W) -> CliResult<bool> {
        let touched = match cmd {
            ReplCommand::Empty => return Ok(true),
            ReplCommand::Quit => return Ok(false),
            ReplCommand::Help => {
                writeln!(out, "{HELP}").map_err(io_err)?;
                return Ok(true);
            }
            ReplCommand::Show => {
                self.show_all(out)?;
                return Ok(true);
            }
            ReplCommand::Svg { path, tree } => {
                match self.container.write_svg(&self.session, tree, &path) {
                    Ok(written) => writeln!(out, "wrote {}", written.display()),
                    Err(e) => writeln!(out, "error: {e}"),
                }
                .map_err(io_err)?;
                return Ok(true);
            }
            ReplCommand::Action(action) => self.apply(action, out)?,
            ReplCommand::Click { tree, ordinal } => match self.session.resolve(tree, ordinal) {
                Ok(id) => self.apply(Action::Click(id), out)?,
                Err(e) => {
                    writeln!(out, "error: {e}").map_err(io_err)?;
                    None
                }
            },
            ReplCommand::Pick(choice) => match self.last_tree {
                Some(tree) => self.apply(Action::Pick { tree, choice }, out)?,
                None => {
                    writeln!(out, "error: no factor choice is open").map_err(io_err)?;
                    None
                }
            },
        };

        if let Some(tree) = touched {
            self.show(tree, out)?;
        }
        writeln!(out, "> {}", self.session.message()).map_err(io_err)?;
        Ok(true)
    }

    /// Dispatches one action and reports its events; returns the tree to redraw.
    fn apply<W: Write>(&mut self, action: Action, out: &mut W) -> CliResult<Option<TreeId>> {
        let events = match self.session.dispatch(action) {
            Ok(events) => events,
            Err(e @ ApplicationError::Domain(_)) => return Err(e.into()),
            Err(e) => {
                writeln!(out, "error: {e}").map_err(io_err)?;
                return Ok(None);
            }
        };

        let mut touched = None;
        let mut offered = None;
        for event in &events {
            writeln!(out, "{event}").map_err(io_err)?;
            match event {
                Event::TreeCreated { tree, .. } | Event::TreeCompleted { tree, .. } => {
                    touched = Some(*tree)
                }
                Event::Decomposed { at, .. } => touched = Some(at.tree),
                Event::ChoicesOffered { at, choices, .. } => {
                    self.last_tree = Some(at.tree);
                    offered = Some((at.tree, choices.clone()));
                }
                Event::SessionReset => self.last_tree = None,
                _ => {}
            }
        }

        if let (true, Some((tree, choices))) = (self.fuzzy, offered) {
            let labels: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
            let selected = self
                .container
                .selector
                .select_one(&SelectionItem::from_labels(&labels), "factor pair> ")
                .map_err(|message| InfraError::Selector { message })?;
            match selected {
                Some(item) => {
                    debug!("selected {}", item.display);
                    return self.apply(
                        Action::Pick {
                            tree,
                            choice: item.index,
                        },
                        out,
                    );
                }
                None => writeln!(out, "selection cancelled").map_err(io_err)?,
            }
        }
        Ok(touched)
    }

    fn show<W: Write>(&self, tree: TreeId, out: &mut W) -> CliResult<()> {
        let canvas = self.session.canvas(tree)?;
        let scene = describe(tree, canvas, self.session.layout().config());
        write!(out, "{}", self.container.text_renderer().render(&scene)).map_err(io_err)?;
        Ok(())
    }

    fn show_all<W: Write>(&self, out: &mut W) -> CliResult<()> {
        if self.session.canvases().is_empty() {
            writeln!(out, "no trees yet").map_err(io_err)?;
        }
        for tree in 0..self.session.canvases().len() {
            self.show(tree, out)?;
        }
        Ok(())
    }
}

fn io_err(e: std::io::Error) -> CliError {
    InfraError::io("write output", e).into()
}

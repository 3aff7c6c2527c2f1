//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{describe, parse_number, Event, NodeId, Session, Strategy};
use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::cli::repl::Repl;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{factor_pairs, is_prime, FactorPair};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::Renderer as _;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_color {
        settings.color = false;
    }
    output::init_color(settings.color);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Check { number }) => cmd_check(number),
        Some(Commands::Factor {
            number,
            strategy,
            choose,
            svg,
        }) => cmd_factor(&container, number, *strategy, choose, svg.as_deref()),
        Some(Commands::Play { number, fuzzy }) => {
            let mut repl = Repl::new(&container, *fuzzy);
            if let Some(n) = number {
                repl.submit(n, &mut io::stdout())?;
            }
            repl.run(io::stdin().lock(), &mut io::stdout())
        }
        Some(Commands::Config) => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try `primetree --help`".to_string(),
        )),
    }
}

#[instrument]
fn cmd_check(raw: &str) -> CliResult<()> {
    let n = parse_number(raw)?;
    if is_prime(n) {
        output::success(&format!("{n} is prime"));
        return Ok(());
    }
    output::header(&format!("{n} is composite"));
    for pair in factor_pairs(n) {
        output::detail(&pair);
    }
    Ok(())
}

/// Applies scripted pairs in pre-order, then lets `strategy` finish the tree.
pub fn build_tree(
    session: &mut Session,
    raw: &str,
    strategy: Strategy,
    choose: &[FactorPair],
) -> CliResult<Vec<Event>> {
    let mut events = session.start(raw)?;
    if matches!(events.last(), Some(Event::PrimeNumber { .. })) {
        return Ok(events);
    }
    let tree = session.canvases().len() - 1;

    for &pair in choose {
        let node = session
            .canvas(tree)?
            .tree
            .first_pending()
            .ok_or_else(|| CliError::InvalidArgs(format!("no node left to split with {pair}")))?;
        let id = NodeId { tree, node };
        events.extend(session.choose_node(id)?);
        events.extend(session.apply_choice(id, pair).map_err(|e| {
            CliError::InvalidArgs(format!("{e}"))
        })?);
    }

    events.extend(session.auto_complete(tree, strategy)?);
    Ok(events)
}

#[instrument(skip(container))]
fn cmd_factor(
    container: &ServiceContainer,
    raw: &str,
    strategy: Option<Strategy>,
    choose: &[FactorPair],
    svg: Option<&Path>,
) -> CliResult<()> {
    let strategy = strategy.unwrap_or(container.settings.strategy);
    let mut session = container.session();
    let events = build_tree(&mut session, raw, strategy, choose)?;
    debug!("{} events", events.len());

    if let Some(Event::PrimeNumber { value }) = events.last() {
        output::warning(session.message());
        debug!("{value} is prime, nothing to draw");
        return Ok(());
    }

    let tree = session.canvases().len() - 1;
    let scene = describe(tree, session.canvas(tree)?, session.layout().config());
    print!("{}", container.text_renderer().render(&scene));

    if let Some(path) = svg {
        let written = container.write_svg(&session, tree, path)?;
        output::success(&format!("wrote {}", written.display()));
    }
    Ok(())
}

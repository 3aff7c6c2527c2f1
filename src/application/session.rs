//! Interaction controller: the session state machine.
//!
//! A session is `Empty` until a composite number is started, then `Active`
//! with one canvas per tree. Every transition either completes fully or
//! leaves the session untouched.

use std::fmt;

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::application::messages;
use crate::application::strategy::Strategy;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    connector, factor_pairs, is_prime, Connector, DomainError, FactorPair, FactorTree,
    Factorization, LayoutEngine, NodeKind, Point,
};

/// Position of a tree canvas within the session.
pub type TreeId = usize;

/// Addresses one node of one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId {
    pub tree: TreeId,
    pub node: Index,
}

/// Factor pairs offered for one node, the transient popup state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePopup {
    pub node: Index,
    pub choices: Vec<FactorPair>,
    pub anchor: Point,
}

/// One tree with everything drawn alongside it.
#[derive(Debug)]
pub struct TreeCanvas {
    pub tree: FactorTree,
    pub connectors: Vec<Connector>,
    pub popup: Option<ChoicePopup>,
    pub result: Option<Factorization>,
}

impl TreeCanvas {
    fn new(tree: FactorTree) -> Self {
        Self {
            tree,
            connectors: Vec::new(),
            popup: None,
            result: None,
        }
    }
}

/// User actions, dispatched by [`Session::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Submit raw input (button or Enter key)
    Start(String),
    /// Add one more tree for the current number
    AddTree,
    Reset,
    /// Click on a bubble, routed by its kind
    Click(NodeId),
    Choose(NodeId),
    Apply(NodeId, FactorPair),
    /// Apply the `choice`-th candidate of the open popup on `tree`
    Pick { tree: TreeId, choice: usize },
    LearnMore,
}

/// Notifications emitted by transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SessionReset,
    TreeCreated {
        tree: TreeId,
        root: u64,
    },
    PrimeNumber {
        value: u64,
    },
    ChoicesOffered {
        at: NodeId,
        value: u64,
        choices: Vec<FactorPair>,
    },
    ChoiceDismissed {
        at: NodeId,
    },
    Decomposed {
        at: NodeId,
        pair: FactorPair,
        children: (Index, Index),
    },
    TreeCompleted {
        tree: TreeId,
        factorization: Factorization,
    },
    PrimeClicked {
        value: u64,
    },
    LearnMore,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SessionReset => write!(f, "session reset"),
            Event::TreeCreated { tree, root } => write!(f, "tree {tree} created for {root}"),
            Event::PrimeNumber { value } => write!(f, "{}", messages::prime_notice(*value)),
            Event::ChoicesOffered { value, choices, .. } => {
                write!(f, "choices for {value}:")?;
                for (i, pair) in choices.iter().enumerate() {
                    write!(f, "  [{i}] {pair}")?;
                }
                Ok(())
            }
            Event::ChoiceDismissed { .. } => write!(f, "previous choice closed"),
            Event::Decomposed { pair, .. } => {
                write!(f, "{} = {}", pair.product(), pair)
            }
            Event::TreeCompleted {
                tree,
                factorization,
            } => write!(
                f,
                "tree {tree} complete: {} | {}",
                factorization.expanded(),
                factorization.compact()
            ),
            Event::PrimeClicked { value } => write!(f, "{}", messages::prime_clicked(*value)),
            Event::LearnMore => write!(f, "{}", messages::LEARN_MORE),
        }
    }
}

/// Session state: current number and the trees created for it.
#[derive(Debug)]
pub struct Session {
    current: Option<u64>,
    canvases: Vec<TreeCanvas>,
    layout: LayoutEngine,
    message: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LayoutEngine::default())
    }
}

/// Parses raw input as an integer greater than 1.
pub fn parse_number(raw: &str) -> ApplicationResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 1 => Ok(n),
        _ => Err(ApplicationError::InvalidInput {
            raw: raw.to_string(),
        }),
    }
}

impl Session {
    pub fn new(layout: LayoutEngine) -> Self {
        Self {
            current: None,
            canvases: Vec::new(),
            layout,
            message: messages::WELCOME.to_string(),
        }
    }

    pub fn current_number(&self) -> Option<u64> {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Raw input is locked while a session is active, until reset.
    pub fn is_input_locked(&self) -> bool {
        self.is_active()
    }

    /// Current assistant guidance text.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn canvases(&self) -> &[TreeCanvas] {
        &self.canvases
    }

    pub fn canvas(&self, tree: TreeId) -> ApplicationResult<&TreeCanvas> {
        self.canvases
            .get(tree)
            .ok_or(ApplicationError::TreeNotFound(tree))
    }

    fn canvas_mut(&mut self, tree: TreeId) -> ApplicationResult<&mut TreeCanvas> {
        self.canvases
            .get_mut(tree)
            .ok_or(ApplicationError::TreeNotFound(tree))
    }

    /// Maps a human-facing node ordinal to its identifier.
    pub fn resolve(&self, tree: TreeId, ordinal: usize) -> ApplicationResult<NodeId> {
        let node = self
            .canvas(tree)?
            .tree
            .by_ordinal(ordinal)
            .ok_or(ApplicationError::NodeNotFound { tree, ordinal })?;
        Ok(NodeId { tree, node })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn dispatch(&mut self, action: Action) -> ApplicationResult<Vec<Event>> {
        match action {
            Action::Start(raw) => self.start(&raw),
            Action::AddTree => self.add_tree().map(|e| vec![e]),
            Action::Reset => Ok(vec![self.reset()]),
            Action::Click(id) => self.click(id),
            Action::Choose(id) => self.choose_node(id),
            Action::Apply(id, pair) => self.apply_choice(id, pair),
            Action::Pick { tree, choice } => self.pick(tree, choice),
            Action::LearnMore => {
                self.message = messages::LEARN_MORE.to_string();
                Ok(vec![Event::LearnMore])
            }
        }
    }

    /// Submits raw input.
    ///
    /// The same number while active adds a tree; a different one resets first,
    /// even when it turns out to be prime. Invalid input changes only the message.
    #[instrument(level = "debug", skip(self))]
    pub fn start(&mut self, raw: &str) -> ApplicationResult<Vec<Event>> {
        let number = match parse_number(raw) {
            Ok(n) => n,
            Err(e) => {
                self.message = messages::INVALID_INPUT.to_string();
                return Err(e);
            }
        };

        let mut events = Vec::new();
        if self.is_active() && self.current != Some(number) {
            events.push(self.reset());
        }

        if is_prime(number) {
            info!("{number} is prime, no tree created");
            self.message = messages::prime_number(number);
            events.push(Event::PrimeNumber { value: number });
            return Ok(events);
        }

        self.current = Some(number);
        events.push(self.create_tree(number)?);
        Ok(events)
    }

    /// Adds one more independent tree for the current number.
    pub fn add_tree(&mut self) -> ApplicationResult<Event> {
        let number = self.current.ok_or(ApplicationError::NoActiveSession)?;
        self.create_tree(number)
    }

    fn create_tree(&mut self, number: u64) -> ApplicationResult<Event> {
        let width = self.layout.config().canvas_width;
        let tree = FactorTree::new(number, self.layout.root_position(width))?;
        self.canvases.push(TreeCanvas::new(tree));
        let id = self.canvases.len() - 1;
        debug!("created tree {id} for {number}");
        self.message = messages::tree_created(number);
        Ok(Event::TreeCreated {
            tree: id,
            root: number,
        })
    }

    /// Clears all trees and the current number.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> Event {
        self.canvases.clear();
        self.current = None;
        self.message = messages::RESET.to_string();
        Event::SessionReset
    }

    /// Routes a click by node kind; decomposed composites ignore clicks.
    pub fn click(&mut self, id: NodeId) -> ApplicationResult<Vec<Event>> {
        let data = &self.canvas(id.tree)?.tree.node(id.node)?.data;
        match (data.kind, data.decomposed) {
            (NodeKind::Prime, _) => self.click_prime(id).map(|e| vec![e]),
            (NodeKind::Composite, false) => self.choose_node(id),
            (NodeKind::Composite, true) => Ok(Vec::new()),
        }
    }

    /// Offers the factor pairs of a pending composite node.
    ///
    /// Opening a popup dismisses any other popup open on the same canvas.
    #[instrument(level = "debug", skip(self))]
    pub fn choose_node(&mut self, id: NodeId) -> ApplicationResult<Vec<Event>> {
        let layout = self.layout.clone();
        let canvas = self.canvas_mut(id.tree)?;
        let data = canvas.tree.node(id.node)?.data.clone();
        if data.kind == NodeKind::Prime {
            return Err(DomainError::NotComposite(data.value).into());
        }
        if data.decomposed {
            return Err(DomainError::AlreadyDecomposed(data.value).into());
        }

        let mut events = Vec::new();
        if let Some(open) = canvas.popup.take() {
            if open.node != id.node {
                events.push(Event::ChoiceDismissed {
                    at: NodeId {
                        tree: id.tree,
                        node: open.node,
                    },
                });
            }
        }
        let choices = factor_pairs(data.value);
        canvas.popup = Some(ChoicePopup {
            node: id.node,
            choices: choices.clone(),
            anchor: layout.popup_anchor(data.position),
        });
        self.message = messages::CHOOSE_PAIR.to_string();
        events.push(Event::ChoicesOffered {
            at: id,
            value: data.value,
            choices,
        });
        Ok(events)
    }

    /// Applies one of the pairs offered by the open popup on this node.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_choice(&mut self, id: NodeId, pair: FactorPair) -> ApplicationResult<Vec<Event>> {
        let layout = self.layout.clone();
        let canvas = self.canvas_mut(id.tree)?;
        let offered = canvas
            .popup
            .as_ref()
            .is_some_and(|p| p.node == id.node && p.choices.contains(&pair));
        if !offered {
            return Err(ApplicationError::ChoiceNotOffered { pair });
        }

        let (left, right) = canvas.tree.decompose(id.node, pair, &layout)?;
        let parent = canvas.tree.node(id.node)?.data.clone();
        for child in [left, right] {
            let to = canvas.tree.node(child)?.data.position;
            canvas.connectors.push(connector(parent.position, to));
        }
        canvas.popup = None;
        self.message = messages::decomposed(parent.value, pair.0, pair.1);

        let mut events = vec![Event::Decomposed {
            at: id,
            pair,
            children: (left, right),
        }];
        events.extend(self.on_completion_check(id.tree)?);
        Ok(events)
    }

    /// Applies the `choice`-th candidate of the popup open on `tree`.
    pub fn pick(&mut self, tree: TreeId, choice: usize) -> ApplicationResult<Vec<Event>> {
        let popup = self
            .canvas(tree)?
            .popup
            .as_ref()
            .ok_or(ApplicationError::NoOpenChoice(tree))?;
        let pair = *popup
            .choices
            .get(choice)
            .ok_or(ApplicationError::ChoiceOutOfRange {
                choice,
                available: popup.choices.len(),
            })?;
        let node = popup.node;
        self.apply_choice(NodeId { tree, node }, pair)
    }

    /// Records the result once every composite node is decomposed.
    #[instrument(level = "debug", skip(self))]
    pub fn on_completion_check(&mut self, tree: TreeId) -> ApplicationResult<Option<Event>> {
        let canvas = self.canvas_mut(tree)?;
        if !canvas.tree.is_complete() || canvas.result.is_some() {
            return Ok(None);
        }
        let factorization = Factorization::new(canvas.tree.root_value(), canvas.tree.prime_leaves());
        info!("tree {tree} complete: {}", factorization.expanded());
        canvas.result = Some(factorization.clone());
        self.message = messages::tree_completed(&factorization);
        Ok(Some(Event::TreeCompleted {
            tree,
            factorization,
        }))
    }

    /// Notice that a prime bubble is terminal; no state change.
    pub fn click_prime(&self, id: NodeId) -> ApplicationResult<Event> {
        let data = &self.canvas(id.tree)?.tree.node(id.node)?.data;
        if data.kind != NodeKind::Prime {
            return Err(DomainError::NotPrime(data.value).into());
        }
        Ok(Event::PrimeClicked { value: data.value })
    }

    /// Decomposes every pending node of `tree` in pre-order using `strategy`.
    #[instrument(level = "debug", skip(self))]
    pub fn auto_complete(&mut self, tree: TreeId, strategy: Strategy) -> ApplicationResult<Vec<Event>> {
        let mut events = Vec::new();
        while let Some(node) = self.canvas(tree)?.tree.first_pending() {
            let id = NodeId { tree, node };
            events.extend(self.choose_node(id)?);
            let pair = match events.last() {
                Some(Event::ChoicesOffered { choices, .. }) => strategy.select(choices),
                _ => None,
            };
            let pair = pair.ok_or(ApplicationError::NoOpenChoice(tree))?;
            events.extend(self.apply_choice(id, pair)?);
        }
        Ok(events)
    }
}

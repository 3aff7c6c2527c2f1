//! Application layer: the interaction controller and its views
//!
//! This layer drives the domain model in response to user actions.

pub mod error;
pub mod messages;
pub mod scene;
pub mod session;
pub mod strategy;

pub use error::{ApplicationError, ApplicationResult};
pub use scene::{describe, NodeShape, NodeStyle, PopupShape, ResultPanel, Scene};
pub use session::{
    parse_number, Action, ChoicePopup, Event, NodeId, Session, TreeCanvas, TreeId,
};
pub use strategy::Strategy;

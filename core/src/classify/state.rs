use std::fmt;

use serde::Serialize;

use crate::context::{IStr, join_names};
use crate::identity::ActorId;
use crate::observer::GroupKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RaiseState {
    #[default]
    None,
    BeingRaised,
    RedundantRaise,
    AlreadyRaised,
}

impl RaiseState {
    pub fn label(&self) -> &'static str {
        match self {
            RaiseState::None => "None",
            RaiseState::BeingRaised => "Being Raised",
            RaiseState::RedundantRaise => "Redundant Raise",
            RaiseState::AlreadyRaised => "Already Raised",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RaiseState::None)
    }

    /// States that name the casters involved
    pub fn shows_casters(&self) -> bool {
        matches!(self, RaiseState::BeingRaised | RaiseState::RedundantRaise)
    }
}

impl fmt::Display for RaiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DispelState {
    #[default]
    None,
    Dispellable,
    BeingDispelled,
    RedundantDispel,
}

impl DispelState {
    pub fn label(&self) -> &'static str {
        match self {
            DispelState::None => "None",
            DispelState::Dispellable => "Dispellable",
            DispelState::BeingDispelled => "Being Dispelled",
            DispelState::RedundantDispel => "Redundant Dispel",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DispelState::None)
    }

    pub fn shows_casters(&self) -> bool {
        matches!(
            self,
            DispelState::BeingDispelled | DispelState::RedundantDispel
        )
    }
}

impl fmt::Display for DispelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the renderer needs to know about one target this tick
#[derive(Debug, Clone, PartialEq)]
pub struct TargetClassification {
    pub actor: ActorId,
    pub name: IStr,
    pub group: GroupKind,
    pub incapacitated: bool,

    pub raise: RaiseState,
    pub dispel: DispelState,

    /// Casters in first-observed order. Empty unless the state names casters.
    pub raise_casters: Vec<IStr>,
    pub dispel_casters: Vec<IStr>,

    pub has_status: bool,

    /// Completion of the most advanced raise cast, if any
    pub raise_progress: Option<f32>,
}

impl TargetClassification {
    /// A target with nothing to show
    pub fn idle(actor: ActorId, name: IStr, group: GroupKind) -> Self {
        Self {
            actor,
            name,
            group,
            incapacitated: false,
            raise: RaiseState::None,
            dispel: DispelState::None,
            raise_casters: Vec::new(),
            dispel_casters: Vec::new(),
            has_status: false,
            raise_progress: None,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        !self.raise.is_none() || !self.dispel.is_none()
    }

    pub fn raise_caster_text(&self) -> String {
        join_names(&self.raise_casters, ", ")
    }

    pub fn dispel_caster_text(&self) -> String {
        join_names(&self.dispel_casters, ", ")
    }
}

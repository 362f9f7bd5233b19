//! Drag interaction state machine.
//!
//! The controller consumes [`DragCommand`] messages in arrival order and
//! commits the resulting dimension or spacing changes to a [`GridModel`].

use crate::geometry::{Baseline, DragKind, GridGeometry};
use crate::model::GridModel;
use kurbo::{Point, Vec2};

/// Input to the drag state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragCommand {
    StartDrag { kind: DragKind, pointer: Point },
    PointerMoved { pointer: Point },
    EndDrag,
}

/// One pointer-down to pointer-up cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    /// Pointer position at drag start.
    pub anchor: Point,
    /// Dimensions at drag start.
    pub baseline: Baseline,
    /// Delta from the anchor at the previous move event.
    last_delta: Vec2,
}

/// State of the drag controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What handling a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The command did not apply in the current state.
    Ignored,
    Started,
    /// A move that produced no model change.
    Unchanged,
    /// The model changed; the presentation must be rebuilt.
    Relayout,
    Ended,
}

impl DragOutcome {
    pub fn needs_relayout(self) -> bool {
        self == DragOutcome::Relayout
    }
}

/// Owns at most one in-progress drag session.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Kind of the active drag, if any.
    pub fn active_kind(&self) -> Option<DragKind> {
        match self.state {
            DragState::Dragging(session) => Some(session.kind),
            DragState::Idle => None,
        }
    }

    /// Process one command against `model`.
    pub fn handle(
        &mut self,
        command: DragCommand,
        model: &mut GridModel,
        geometry: &GridGeometry,
    ) -> DragOutcome {
        match command {
            DragCommand::StartDrag { kind, pointer } => {
                if let DragState::Dragging(previous) = self.state {
                    log::debug!("Drag {:?} superseded by {:?}", previous.kind, kind);
                }
                self.state = DragState::Dragging(DragSession {
                    kind,
                    anchor: pointer,
                    baseline: Baseline::of(model),
                    last_delta: Vec2::ZERO,
                });
                log::debug!("Drag {:?} started at {:?}", kind, pointer);
                DragOutcome::Started
            }
            DragCommand::PointerMoved { pointer } => {
                let DragState::Dragging(session) = &mut self.state else {
                    return DragOutcome::Ignored;
                };
                let delta = pointer - session.anchor;
                if session.kind.is_resize() {
                    let next = geometry.apply_drag_delta(model, session.kind, delta, session.baseline);
                    if next == *model {
                        return DragOutcome::Unchanged;
                    }
                    log::debug!(
                        "Resize to {}x{} (columns x rows)",
                        next.columns(),
                        next.rows()
                    );
                    *model = next;
                } else {
                    let step = delta - session.last_delta;
                    session.last_delta = delta;
                    *model = geometry.apply_drag_delta(model, session.kind, step, session.baseline);
                }
                DragOutcome::Relayout
            }
            DragCommand::EndDrag => {
                if let DragState::Dragging(session) = self.state {
                    log::debug!("Drag {:?} ended", session.kind);
                    self.state = DragState::Idle;
                    DragOutcome::Ended
                } else {
                    DragOutcome::Ignored
                }
            }
        }
    }
}

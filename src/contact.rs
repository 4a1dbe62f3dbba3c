use crate::entity::{Hazard, HazardKind, Position};
use crate::grid::{CellState, Grid};
use crate::trail::Trail;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Contact {
    /// A hazard caught the player.
    Player { hazard: HazardKind, at: Position },
    /// A hazard touched the trail being drawn.
    Trail { hazard: HazardKind, at: Position },
    /// A patroller reached the land cell the trail started from.
    Anchor { at: Position },
}

/// Checks one tick's worth of movement. The first contact found wins.
///
/// The player is caught when standing on a hazard's current cell or on the
/// cell it just left, so the two cannot swap places unharmed.
pub fn detect<'a>(
    player: Position,
    trail: Option<&Trail>,
    grid: &Grid,
    hazards: impl IntoIterator<Item = &'a dyn Hazard>,
) -> Option<Contact> {
    for hazard in hazards {
        let kind = hazard.kind();
        let at = hazard.position();

        if player == at || player == hazard.previous() {
            return Some(Contact::Player {
                hazard: kind,
                at: player,
            });
        }
        if grid.classify(at) == CellState::Trail {
            return Some(Contact::Trail { hazard: kind, at });
        }
        if let Some(struck) = hazard.strike() {
            if grid.classify(struck) == CellState::Trail {
                return Some(Contact::Trail {
                    hazard: kind,
                    at: struck,
                });
            }
        }
        if let Some(trail) = trail {
            if kind == HazardKind::Patroller && at == trail.anchor() {
                return Some(Contact::Anchor { at });
            }
        }
    }
    None
}

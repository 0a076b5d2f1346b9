//! Input actions delivered by the host.
//!
//! The host maps its raw window events to [`Action`]s and hands each one,
//! with its [`ActionPhase`], to the scene's single handler.

use isovox_core::{Input, Vec2};

/// Whether an action began or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    /// Key pressed, button pressed, pointer moved.
    Start,
    /// Key or button released.
    End,
}

/// A named action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move towards the top of the screen.
    Up,
    /// Move towards the bottom of the screen.
    Down,
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Alias of [`Action::Up`].
    Forward,
    /// Pointer pressed at a render-space position.
    PointerClick(Vec2),
    /// Pointer moved to a render-space position.
    PointerMove(Vec2),
    /// Scroll wheel delta, positive away from the user.
    Scroll(f32),
    /// Leave the scene.
    Escape,
}

impl Action {
    /// Pointer position carried by the action, if any.
    #[must_use]
    pub const fn pointer(self) -> Option<Vec2> {
        match self {
            Self::PointerClick(pos) | Self::PointerMove(pos) => Some(pos),
            _ => None,
        }
    }
}

/// Applies a movement action to the controlled entity's input record.
///
/// Returns `false` for actions that are not movement.
pub fn apply_movement(input: &mut Input, action: Action, phase: ActionPhase) -> bool {
    let pressed = phase == ActionPhase::Start;
    let flag = match action {
        Action::Up => &mut input.up,
        Action::Down => &mut input.down,
        Action::Left => &mut input.left,
        Action::Right => &mut input.right,
        Action::Forward => &mut input.forward,
        _ => return false,
    };
    *flag = pressed;
    true
}

/// Unit direction the input record asks for, in render space.
///
/// Opposing keys cancel; diagonals are normalised.
#[must_use]
pub fn movement_direction(input: &Input) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if input.left {
        direction.x -= 1.0;
    }
    if input.right {
        direction.x += 1.0;
    }
    if input.up || input.forward {
        direction.y -= 1.0;
    }
    if input.down {
        direction.y += 1.0;
    }
    direction.normalize()
}

//! Operating vs. editing state of the lot.
//!
//! The engine holds the authoritative flag; [`LotMode`] mirrors it so other
//! plugins can hang systems on `OnEnter`/`OnExit` or gate them with
//! `in_state`. The executor is the only writer of `NextState<LotMode>`.

use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LotMode {
    /// Park and unpark requests are served.
    #[default]
    Operating,
    /// The layout editor is open; park and unpark are refused.
    Editing,
}

//! Two-way synchronization between the bonnet angle and the input offset.
//!
//! Both controls are editable. An edit of one control resolves the nearest
//! table entry and writes the matching value into the other control. That
//! write is a change event too, and its echo must not be written back, so
//! every edit runs exactly one round:
//!
//! ```text
//! edit A -> resolve by A -> write B -> resolve by B (echo, no write) -> idle
//! ```
//!
//! Edits are processed one at a time and each completes before the next.
use crate::{LookupEntry, LookupTable};

/// The two synchronized controls.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Control {
    /// Bonnet opening angle (degrees)
    BonnetAngle,
    /// Input crank offset (degrees)
    InputOffset,
}

impl Control {
    /// The other control.
    pub const fn other(&self) -> Self {
        match self {
            Self::BonnetAngle => Self::InputOffset,
            Self::InputOffset => Self::BonnetAngle,
        }
    }
}

/// State of the synchronization latch.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum SyncState {
    /// Waiting for an edit
    #[default]
    Idle,
    /// The input offset was edited, the bonnet angle write is pending its echo
    ProcessingFromOffset,
    /// The bonnet angle was edited, the input offset write is pending its echo
    ProcessingFromAngle,
}

impl SyncState {
    /// Transition on a change of `control`.
    ///
    /// Return the next state and whether the resolved value should be written
    /// to the other control.
    pub const fn on_change(self, control: Control) -> (Self, bool) {
        match (self, control) {
            (Self::ProcessingFromAngle, Control::InputOffset)
            | (Self::ProcessingFromOffset, Control::BonnetAngle) => (Self::Idle, false),
            (_, Control::BonnetAngle) => (Self::ProcessingFromAngle, true),
            (_, Control::InputOffset) => (Self::ProcessingFromOffset, true),
        }
    }
}

/// A value written into a control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Write {
    /// The written control
    pub control: Control,
    /// The written value
    pub value: f64,
}

/// Outcome of an edit.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Resolved {
    /// The last resolved entry, used to draw the pose
    pub entry: LookupEntry,
    /// The write-back, if the value was changed
    pub write: Option<Write>,
}

/// Keeper of the two controls and the latch between them.
#[derive(Clone, Debug, Default)]
pub struct Synchronizer {
    state: SyncState,
    bonnet_angle: f64,
    input_offset: f64,
}

impl Synchronizer {
    /// Create a synchronizer with both controls at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current latch state, idle between edits.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Current bonnet angle control value.
    pub fn bonnet_angle(&self) -> f64 {
        self.bonnet_angle
    }

    /// Current input offset control value.
    pub fn input_offset(&self) -> f64 {
        self.input_offset
    }

    /// The user edited the bonnet angle.
    pub fn edit_bonnet_angle(&mut self, table: &LookupTable, angle: f64) -> Resolved {
        self.edit(table, Control::BonnetAngle, angle)
    }

    /// The user edited the input offset.
    pub fn edit_input_offset(&mut self, table: &LookupTable, offset: f64) -> Resolved {
        self.edit(table, Control::InputOffset, offset)
    }

    /// Re-resolve after the table was rebuilt, keeping the bonnet angle.
    pub fn retable(&mut self, table: &LookupTable) -> Resolved {
        self.changed(table, Control::BonnetAngle)
    }

    fn edit(&mut self, table: &LookupTable, control: Control, value: f64) -> Resolved {
        if *self.value_mut(control) == value {
            // Unchanged value is not an event
            let entry = *Self::resolve(table, control, value);
            return Resolved { entry, write: None };
        }
        *self.value_mut(control) = value;
        self.changed(table, control)
    }

    /// Process a change event and its echo until the latch is idle.
    fn changed(&mut self, table: &LookupTable, control: Control) -> Resolved {
        let mut resolved = Resolved { entry: LookupEntry::default(), write: None };
        let mut event = Some(control);
        while let Some(control) = event.take() {
            let (next, write_back) = self.state.on_change(control);
            tracing::trace!(?control, from = ?self.state, to = ?next, "latch");
            self.state = next;
            let value = *self.value_mut(control);
            resolved.entry = *Self::resolve(table, control, value);
            if !write_back {
                continue;
            }
            let target = control.other();
            let value = match target {
                Control::BonnetAngle => resolved.entry.bonnet_angle,
                Control::InputOffset => resolved.entry.input_offset,
            };
            let slot = self.value_mut(target);
            if *slot == value {
                // No change event for an equal value, nothing will echo
                self.state = SyncState::Idle;
            } else {
                *slot = value;
                resolved.write = Some(Write { control: target, value });
                event = Some(target);
            }
        }
        resolved
    }

    fn value_mut(&mut self, control: Control) -> &mut f64 {
        match control {
            Control::BonnetAngle => &mut self.bonnet_angle,
            Control::InputOffset => &mut self.input_offset,
        }
    }

    fn resolve(table: &LookupTable, control: Control, value: f64) -> &LookupEntry {
        match control {
            Control::BonnetAngle => table.nearest_by_bonnet_angle(value),
            Control::InputOffset => table.nearest_by_input_offset(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SweepEnd;

    fn table() -> LookupTable {
        let entries = [(0., 0.), (-1., 1.5), (-2., 3.), (-3., 4.2)]
            .into_iter()
            .map(|(input_offset, bonnet_angle)| LookupEntry {
                input_offset,
                bonnet_angle,
                ..Default::default()
            })
            .collect();
        LookupTable::from_entries(entries, SweepEnd::Infeasible).unwrap()
    }

    #[test]
    fn transition_table() {
        use Control::*;
        use SyncState::*;
        assert_eq!(Idle.on_change(BonnetAngle), (ProcessingFromAngle, true));
        assert_eq!(Idle.on_change(InputOffset), (ProcessingFromOffset, true));
        assert_eq!(ProcessingFromAngle.on_change(InputOffset), (Idle, false));
        assert_eq!(ProcessingFromOffset.on_change(BonnetAngle), (Idle, false));
        assert_eq!(ProcessingFromAngle.on_change(BonnetAngle), (ProcessingFromAngle, true));
        assert_eq!(ProcessingFromOffset.on_change(InputOffset), (ProcessingFromOffset, true));
    }

    #[test]
    fn angle_edit_writes_once() {
        let table = table();
        let mut sync = Synchronizer::new();
        let ans = sync.edit_bonnet_angle(&table, 3.1);
        assert_eq!(ans.write, Some(Write { control: Control::InputOffset, value: -2. }));
        assert_eq!(ans.entry.bonnet_angle, 3.);
        // The echo did not overwrite the edited angle with the snapped one
        assert_eq!(sync.bonnet_angle(), 3.1);
        assert_eq!(sync.input_offset(), -2.);
        assert_eq!(sync.state(), SyncState::Idle);
    }

    #[test]
    fn offset_edit_writes_once() {
        let table = table();
        let mut sync = Synchronizer::new();
        let ans = sync.edit_input_offset(&table, -0.9);
        assert_eq!(ans.write, Some(Write { control: Control::BonnetAngle, value: 1.5 }));
        assert_eq!(sync.input_offset(), -0.9);
        assert_eq!(sync.bonnet_angle(), 1.5);
        assert_eq!(sync.state(), SyncState::Idle);
        // The next independent edit of the other control writes back again
        let ans = sync.edit_bonnet_angle(&table, 4.);
        assert_eq!(ans.write, Some(Write { control: Control::InputOffset, value: -3. }));
        assert_eq!(sync.state(), SyncState::Idle);
    }

    #[test]
    fn equal_write_back_is_silent() {
        let table = table();
        let mut sync = Synchronizer::new();
        // Nearest offset is still zero
        let ans = sync.edit_bonnet_angle(&table, 0.5);
        assert_eq!(ans.write, None);
        assert_eq!(sync.state(), SyncState::Idle);
        let ans = sync.edit_input_offset(&table, -2.9);
        assert_eq!(ans.write, Some(Write { control: Control::BonnetAngle, value: 4.2 }));
        // Same value again is not an edit
        assert_eq!(sync.edit_input_offset(&table, -2.9).write, None);
    }

    #[test]
    fn retable_keeps_angle() {
        let mut sync = Synchronizer::new();
        sync.edit_bonnet_angle(&table(), 4.2);
        assert_eq!(sync.input_offset(), -3.);
        let ans = sync.retable(&LookupTable::degenerate());
        assert_eq!(ans.write, Some(Write { control: Control::InputOffset, value: 0. }));
        assert_eq!(sync.bonnet_angle(), 4.2);
        assert_eq!(sync.state(), SyncState::Idle);
    }
}

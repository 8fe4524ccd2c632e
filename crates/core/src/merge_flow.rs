//! Explicit state machine for the duplicate merge wizard.
//!
//! The UI walks scan → review group → choose primary → confirm; this
//! module gives that flow explicit states and transitions instead of
//! component-local mutable flags. Invalid transitions are validation
//! errors so a confused client can never corrupt the flow.

use serde::Serialize;

use crate::error::CoreError;

/// Wizard states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Scanning,
    ListingGroups,
    ReviewingMerge,
    Merging,
    Failed,
}

/// Events that drive the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    StartScan,
    ScanCompleted,
    ScanFailed,
    SelectGroup,
    CancelReview,
    ConfirmMerge,
    MergeSucceeded,
    MergeFailed,
    Retry,
    Reset,
}

/// The merge wizard flow. Starts at [`FlowState::Idle`].
#[derive(Debug, Clone)]
pub struct MergeFlow {
    state: FlowState,
}

impl Default for MergeFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Apply an event, returning the new state.
    ///
    /// `Reset` is accepted from any settled state; it is rejected while a
    /// scan or merge is in flight (those must complete or fail first).
    pub fn apply(&mut self, event: FlowEvent) -> Result<FlowState, CoreError> {
        use FlowEvent::*;
        use FlowState::*;

        let next = match (self.state, event) {
            (Idle, StartScan) => Scanning,
            (Scanning, ScanCompleted) => ListingGroups,
            (Scanning, ScanFailed) => Failed,
            (ListingGroups, SelectGroup) => ReviewingMerge,
            (ListingGroups, StartScan) => Scanning,
            (ReviewingMerge, ConfirmMerge) => Merging,
            (ReviewingMerge, CancelReview) => ListingGroups,
            (Merging, MergeSucceeded) => ListingGroups,
            (Merging, MergeFailed) => Failed,
            (Failed, Retry) => ListingGroups,
            (Idle | ListingGroups | ReviewingMerge | Failed, Reset) => Idle,
            (state, event) => {
                return Err(CoreError::Validation(format!(
                    "Invalid merge flow transition: {event:?} in state {state:?}"
                )));
            }
        };

        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FlowEvent::*;
    use FlowState::*;

    fn flow_in(events: &[FlowEvent]) -> MergeFlow {
        let mut flow = MergeFlow::new();
        for &event in events {
            flow.apply(event).unwrap();
        }
        flow
    }

    #[test]
    fn happy_path_walks_scan_review_merge() {
        let mut flow = MergeFlow::new();
        assert_eq!(flow.state(), Idle);
        assert_eq!(flow.apply(StartScan).unwrap(), Scanning);
        assert_eq!(flow.apply(ScanCompleted).unwrap(), ListingGroups);
        assert_eq!(flow.apply(SelectGroup).unwrap(), ReviewingMerge);
        assert_eq!(flow.apply(ConfirmMerge).unwrap(), Merging);
        assert_eq!(flow.apply(MergeSucceeded).unwrap(), ListingGroups);
    }

    #[test]
    fn failed_merge_can_be_retried() {
        let mut flow = flow_in(&[StartScan, ScanCompleted, SelectGroup, ConfirmMerge]);
        assert_eq!(flow.apply(MergeFailed).unwrap(), Failed);
        // Retry returns to the group list so only the failed pair is redone.
        assert_eq!(flow.apply(Retry).unwrap(), ListingGroups);
    }

    #[test]
    fn review_can_be_cancelled() {
        let mut flow = flow_in(&[StartScan, ScanCompleted, SelectGroup]);
        assert_eq!(flow.apply(CancelReview).unwrap(), ListingGroups);
    }

    #[test]
    fn rescan_is_allowed_from_group_list() {
        let mut flow = flow_in(&[StartScan, ScanCompleted]);
        assert_eq!(flow.apply(StartScan).unwrap(), Scanning);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut flow = MergeFlow::new();
        assert!(flow.apply(ConfirmMerge).is_err());
        assert!(flow.apply(MergeSucceeded).is_err());
        // Failed transitions leave the state unchanged.
        assert_eq!(flow.state(), Idle);
    }

    #[test]
    fn reset_is_rejected_mid_flight() {
        let mut flow = flow_in(&[StartScan]);
        assert!(flow.apply(Reset).is_err());
        assert_eq!(flow.state(), Scanning);

        let mut flow = flow_in(&[StartScan, ScanCompleted, SelectGroup, ConfirmMerge]);
        assert!(flow.apply(Reset).is_err());
        assert_eq!(flow.state(), Merging);
    }

    #[test]
    fn reset_returns_settled_states_to_idle() {
        for events in [
            &[StartScan, ScanCompleted][..],
            &[StartScan, ScanFailed][..],
            &[StartScan, ScanCompleted, SelectGroup][..],
        ] {
            let mut flow = flow_in(events);
            assert_eq!(flow.apply(Reset).unwrap(), Idle);
        }
    }
}

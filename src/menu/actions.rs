/// Actions the power supply menu can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Hand the display back to the telemetry screen
    ShowTelemetry,
    /// Cycle the layout of the first line
    NextLine0,
    /// Cycle the layout of the second line
    NextLine1,
    SelectSupplyA,
    SelectSupplyB,
    /// Edit the limit of the selected supply
    AdjustCurLimit,
    /// Show the edited limit without an edit marker
    ShowCurLimit,
    IncCurLimit,
    DecCurLimit,
    /// Make the edited limits effective and release any tripped supply
    AcceptCurLimit,
    /// Discard the edits
    RejectCurLimit,
}

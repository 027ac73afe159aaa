//! Shared crate-wide constants.

/// Minimum window size in cells. Small enough for cramped terminals, large
/// enough that the chrome (header buttons, toolbar, input row) stays usable.
pub const MIN_WINDOW_WIDTH: u16 = 30;
pub const MIN_WINDOW_HEIGHT: u16 = 10;

/// Size given to freshly created chat windows before clamping.
pub const DEFAULT_WINDOW_WIDTH: u16 = 56;
pub const DEFAULT_WINDOW_HEIGHT: u16 = 18;

/// Cascade placement for new windows: each window opens this many cells
/// right/down from the previous one so stacks stay distinguishable. The
/// viewport clamp absorbs whatever runs past the edge.
pub const CASCADE_ORIGIN_X: i32 = 4;
pub const CASCADE_ORIGIN_Y: i32 = 1;
pub const CASCADE_STEP_X: i32 = 4;
pub const CASCADE_STEP_Y: i32 = 2;

/// Height of the taskbar panel row reserved at the bottom of the terminal.
pub const PANEL_HEIGHT: u16 = 1;

/// Default per-request timeout for the completion endpoint, in seconds.
/// Overridable with `--timeout-secs`.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

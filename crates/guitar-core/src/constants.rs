// Shared layout/audio/animation tuning constants used by the core and the native frontend.

// Strings
pub const STRING_COUNT: usize = 12;
pub const VERTICAL_STRING_COUNT: usize = 6; // indices 0..6 are vertical, 6..12 horizontal
pub const GRID_DIVISIONS: usize = 3; // 3x3 grid: two inner lines each way, three bands per line

// Reserved bands above and below the camera area (added to the safe-area insets)
pub const RESERVED_TOP_PX: f32 = 60.0;
pub const RESERVED_BOTTOM_PX: f32 = 180.0;

// Boundary tolerance for vertical strings
pub const FIRST_BAND_EXTENSION_PX: f32 = 30.0; // first band reaches this far above and below its span
pub const LAST_BAND_EXTENSION_PX: f32 = 90.0; // last band reaches this far past its end

// Hit testing
pub const TOUCH_THRESHOLD_PX: f32 = 30.0; // hit radius at the reference width
pub const REFERENCE_WIDTH_PX: f32 = 390.0;

// Idle oscillation
pub const IDLE_AMPLITUDE_PX: f32 = 1.5;
pub const IDLE_BASE_FREQUENCY: f32 = 2.0;
pub const IDLE_FREQUENCY_STEP: f32 = 0.5; // per string index, desynchronizes the lines
pub const IDLE_TIME_SCALE: f64 = 0.6; // animation-time units per second (0.01 per 60 Hz frame)

// Touch vibration
pub const VIBRATION_DURATION_SEC: f64 = 0.3;
pub const VIBRATION_KEYFRAMES_PX: [f32; 5] = [-2.0, 2.0, -2.0, 2.0, 0.0];

// Line styling
pub const LINE_ALPHA: f32 = 0.5;
pub const LINE_WIDTH_PT: f32 = 0.5;
pub const CORNER_GUIDE_ALPHA: f32 = 0.4;
pub const CORNER_GUIDE_LENGTH_PX: f32 = 15.0;

// Default sample names, one per string index
pub const DEFAULT_SAMPLE_NAMES: [&str; STRING_COUNT] = [
    "sound1", "sound2", "sound3", "sound4", "sound5", "sound6", "sound7", "sound8", "sound9",
    "sound10", "sound11", "sound12",
];

#[inline]
pub fn touch_threshold_for_width(width: f32) -> f32 {
    TOUCH_THRESHOLD_PX * (width / REFERENCE_WIDTH_PX)
}

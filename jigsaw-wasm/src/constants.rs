//! Shell-wide constants. Lengths are canvas pixels unless noted otherwise.

/// Element ids the host page is expected to provide.
pub const CANVAS_ID: &str = "cv";
pub const REGENERATE_ID: &str = "regenerate";
pub const STATUS_ID: &str = "status";
pub const FILE_INPUT_ID: &str = "file";

/// Image service used when no `img` query parameter is given; the assembled
/// picture size is appended as `/{w}/{h}`.
pub const DEFAULT_IMAGE_BASE: &str = "https://picsum.photos";

/// Drop shadow painted under whatever is being dragged.
pub const HIGHLIGHT_COLOR: &str = "red";
pub const HIGHLIGHT_BLUR: f64 = 5.0;
pub const HIGHLIGHT_OPACITY: f64 = 0.5;
pub const HIGHLIGHT_OFFSET: f64 = 5.0;

pub const OUTLINE_COLOR: &str = "rgba(0, 0, 0, 0.35)";
/// Fill used until (or instead of) the picture.
pub const BLANK_FILL: &str = "#ddd";
pub const BACKGROUND: &str = "#f7f7f7";

pub const SOLVED_COLOR: &str = "green";
pub const UNSOLVED_COLOR: &str = "inherit";

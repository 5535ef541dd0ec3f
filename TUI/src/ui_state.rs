/// Presentation-only state: nothing in here affects search results.
#[derive(Default)]
pub struct UIState {
    /// First grid row shown
    pub scroll_offset: usize,
    pub status_message: Option<String>,

    // Tick at which the status message was set
    pub status_set_at: u64,

    // Send animation state (ticks remaining)
    pub send_animation: u8,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }
}

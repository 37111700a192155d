//! Recording VM

use stagehand_core::{CanonicalKeyEvent, CanonicalPointerEvent, DeviceKind, IoData};
use stagehand_input::IoSink;
use stagehand_runtime::Vm;

/// VM double that records everything posted to its input channel
#[derive(Debug, Default)]
pub struct RecordingVm {
    pub posted: Vec<IoData>,
    pub compatibility_mode: Option<bool>,
    pub starts: u32,
    pub green_flags: u32,
}

impl RecordingVm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_events(&self) -> impl Iterator<Item = &CanonicalPointerEvent> {
        self.posted.iter().filter_map(|d| match d {
            IoData::Mouse(ev) => Some(ev),
            IoData::Keyboard(_) => None,
        })
    }

    pub fn key_events(&self) -> impl Iterator<Item = &CanonicalKeyEvent> {
        self.posted.iter().filter_map(|d| match d {
            IoData::Keyboard(ev) => Some(ev),
            IoData::Mouse(_) => None,
        })
    }

    pub fn count(&self, device: DeviceKind) -> usize {
        self.posted.iter().filter(|d| d.device() == device).count()
    }

    pub fn clear(&mut self) {
        self.posted.clear();
    }
}

impl IoSink for RecordingVm {
    fn post_io_data(&mut self, data: IoData) {
        tracing::trace!(device = %data.device(), "io data posted");
        self.posted.push(data);
    }
}

impl Vm for RecordingVm {
    fn set_compatibility_mode(&mut self, enabled: bool) {
        self.compatibility_mode = Some(enabled);
    }

    fn start(&mut self) {
        self.starts += 1;
    }

    fn green_flag(&mut self) {
        self.green_flags += 1;
    }
}

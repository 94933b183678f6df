//! Drag-and-drop gesture detection
//!
//! Turns the low-level drag events a drop surface receives into a
//! continuous "is dragging" flag and a single notification per drop.

use deckdrop_core::RawFile;
use serde::Serialize;
use tracing::debug;

/// Platform drag event delivered to a drop surface.
#[derive(Debug, Clone)]
pub enum DragEvent {
    /// A drag entered the surface. `external` is true when it carries files
    /// from outside the application.
    Enter { external: bool },
    /// A drag is moving over the surface
    Over,
    /// A drag left the surface without dropping
    Leave,
    /// Items were released over the surface
    Drop { files: Vec<RawFile> },
}

impl DragEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DragEvent::Enter { .. } => "dragenter",
            DragEvent::Over => "dragover",
            DragEvent::Leave => "dragleave",
            DragEvent::Drop { .. } => "drop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    DragOver,
}

/// What the platform should do with an event after the detector saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResponse {
    /// Suppress the platform's default action (e.g. opening the file)
    pub prevent_default: bool,
    /// Phase after the event was applied
    pub phase: DragPhase,
}

type DropCallback = Box<dyn FnMut(RawFile) + Send>;

/// State machine for one drop surface.
///
/// `Idle --enter--> DragOver --leave|drop--> Idle`. A drop hands the first
/// dropped file to the `on_change` callback before the detector settles
/// back to idle; any further files in the same gesture are ignored.
pub struct GestureDetector {
    phase: DragPhase,
    on_change: DropCallback,
}

impl GestureDetector {
    pub fn new<F>(on_change: F) -> Self
    where
        F: FnMut(RawFile) + Send + 'static,
    {
        Self {
            phase: DragPhase::Idle,
            on_change: Box::new(on_change),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::DragOver
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Apply one platform event
    pub fn handle(&mut self, event: DragEvent) -> DragResponse {
        let name = event.name();

        let prevent_default = match event {
            // Internal drags (text selections and the like) are not ours
            DragEvent::Enter { external: false } => false,
            DragEvent::Enter { external: true } => {
                self.phase = DragPhase::DragOver;
                true
            }
            DragEvent::Over => true,
            DragEvent::Leave => {
                self.phase = DragPhase::Idle;
                true
            }
            DragEvent::Drop { files } => {
                self.phase = DragPhase::Idle;

                let extra = files.len().saturating_sub(1);
                if let Some(file) = files.into_iter().next() {
                    if extra > 0 {
                        debug!(ignored = extra, "Multiple files dropped, using the first");
                    }
                    (self.on_change)(file);
                }
                true
            }
        };

        debug!(event = name, phase = ?self.phase, "Drag event handled");

        DragResponse {
            prevent_default,
            phase: self.phase,
        }
    }
}

impl std::fmt::Debug for GestureDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDetector")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//! Signature capture.
//!
//! A signature is either typed text or a freehand drawing, never both. The
//! pad enforces the exclusivity: switching mode discards whatever the other
//! mode captured, so a stale signature of the wrong type can never be
//! submitted. The drawn value is re-exported on every pointer movement and
//! on pen-up, matching how the capture widget reports its snapshot.

pub mod draw;

pub use draw::{BitmapSurface, DrawSurface};

use serde::{Deserialize, Serialize};

/// Which capture mode a signature used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    /// Signer typed their name.
    #[default]
    Typed,
    /// Signer drew on the capture surface.
    Drawn,
}

/// Capture state for one contract's signature.
pub struct SignaturePad {
    mode: SignatureMode,
    typed: String,
    drawn: Option<String>,
    surface: Box<dyn DrawSurface>,
}

impl SignaturePad {
    /// Create a pad in typed mode with the default bitmap surface.
    pub fn new() -> Self {
        Self::with_surface(Box::new(BitmapSurface::default()))
    }

    /// Create a pad backed by a custom surface.
    pub fn with_surface(surface: Box<dyn DrawSurface>) -> Self {
        Self {
            mode: SignatureMode::Typed,
            typed: String::new(),
            drawn: None,
            surface,
        }
    }

    /// Current capture mode.
    pub fn mode(&self) -> SignatureMode {
        self.mode
    }

    /// Switch capture mode, discarding the other mode's value.
    pub fn set_mode(&mut self, mode: SignatureMode) {
        if self.mode == mode {
            return;
        }
        match mode {
            SignatureMode::Typed => {
                self.surface.clear();
                self.drawn = None;
            }
            SignatureMode::Drawn => {
                self.typed.clear();
            }
        }
        self.mode = mode;
    }

    /// Replace the typed text. Only meaningful in typed mode.
    pub fn enter_text(&mut self, text: &str) {
        if self.mode == SignatureMode::Typed {
            self.typed = text.to_string();
        }
    }

    /// Pen down on the drawing surface.
    pub fn stroke_start(&mut self, x: u32, y: u32) {
        if self.mode == SignatureMode::Drawn {
            self.surface.stroke_start(x, y);
            self.drawn = self.surface.export_image();
        }
    }

    /// Pen dragged while down; the stored value is recomputed immediately.
    pub fn stroke_move(&mut self, x: u32, y: u32) {
        if self.mode == SignatureMode::Drawn {
            self.surface.stroke_move(x, y);
            self.drawn = self.surface.export_image();
        }
    }

    /// Pen lifted; the stored value is recomputed.
    pub fn stroke_end(&mut self) {
        if self.mode == SignatureMode::Drawn {
            self.surface.stroke_end();
            self.drawn = self.surface.export_image();
        }
    }

    /// Erase the current mode's captured value.
    pub fn clear(&mut self) {
        match self.mode {
            SignatureMode::Typed => self.typed.clear(),
            SignatureMode::Drawn => {
                self.surface.clear();
                self.drawn = None;
            }
        }
    }

    /// The captured signature value, `None` when nothing usable is present.
    pub fn value(&self) -> Option<&str> {
        match self.mode {
            SignatureMode::Typed => {
                let trimmed = self.typed.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            }
            SignatureMode::Drawn => self.drawn.as_deref(),
        }
    }
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new()
    }
}

//! QR rendering of the revealed phrase.

use qrcodegen::{QrCode, QrCodeEcc};
use serde::Serialize;

/// Square module grid of a QR code, row-major, `true` for dark modules.
#[derive(Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct QrMatrix {
    /// Modules per side.
    pub size: u32,
    /// `size * size` modules, row by row.
    pub modules: Vec<bool>,
}

impl QrMatrix {
    /// Whether the module at column `x`, row `y` is dark. Out of range reads as light.
    #[must_use]
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.modules[(y * self.size + x) as usize]
    }
}

// The matrix encodes the phrase; keep it out of logs.
impl std::fmt::Debug for QrMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrMatrix").field("size", &self.size).finish_non_exhaustive()
    }
}

/// Encodes `text` with medium error correction. `None` for empty or oversized input.
pub(crate) fn encode(text: &str) -> Option<QrMatrix> {
    if text.is_empty() {
        return None;
    }
    let code = QrCode::encode_text(text, QrCodeEcc::Medium).ok()?;
    let size = code.size();
    if size <= 0 {
        return None;
    }
    let side = size.unsigned_abs();
    let mut modules = Vec::with_capacity((side * side) as usize);
    for y in 0..size {
        for x in 0..size {
            modules.push(code.get_module(x, y));
        }
    }
    Some(QrMatrix {
        size: side,
        modules,
    })
}

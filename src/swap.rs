use std::ops::Range;

/// One of the two stacked buffers inside the doubled virtual height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    /// Starts at y offset 0.
    Upper,
    /// Starts at y offset `yres`.
    Lower,
}

impl Half {
    pub fn other(self) -> Half {
        match self {
            Half::Upper => Half::Lower,
            Half::Lower => Half::Upper,
        }
    }

    pub fn y_offset(self, yres: u32) -> u32 {
        match self {
            Half::Upper => 0,
            Half::Lower => yres,
        }
    }
}

/// Tracks which half is on screen and which one accepts writes.
///
/// The drawable half is always the complement of the visible one. Before the
/// first [`advance`](SwapController::advance) nothing has been panned yet and
/// the upper half is drawable.
#[derive(Debug, Clone)]
pub struct SwapController {
    yres: u32,
    line_length: usize,
    visible: Option<Half>,
}

impl SwapController {
    pub fn new(yres: u32, line_length: usize) -> Self {
        Self { yres, line_length, visible: None }
    }

    /// Flips the halves and returns the one that should now be scanned out.
    pub fn advance(&mut self) -> Half {
        let next = match self.visible {
            Some(Half::Lower) => Half::Upper,
            _ => Half::Lower,
        };
        self.visible = Some(next);
        next
    }

    pub fn visible(&self) -> Option<Half> {
        self.visible
    }

    pub fn drawable(&self) -> Half {
        self.visible.map_or(Half::Upper, Half::other)
    }

    /// Pan offset of the visible half, if any swap has happened.
    pub fn visible_offset(&self) -> Option<u32> {
        self.visible.map(|h| h.y_offset(self.yres))
    }

    pub fn half_len(&self) -> usize {
        self.yres as usize * self.line_length
    }

    pub fn range(&self, half: Half) -> Range<usize> {
        let start = half.y_offset(self.yres) as usize * self.line_length;
        start..start + self.half_len()
    }

    pub fn drawable_range(&self) -> Range<usize> {
        self.range(self.drawable())
    }
}

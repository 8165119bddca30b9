use std::time::Duration;

/// Delay used for every frame when the asset carries no delay metadata.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;
/// Lower bound for any frame delay; keeps a zero delay from spinning the clock.
pub const MIN_FRAME_DELAY_MS: u32 = 10;

/// Per-frame display durations, one entry per frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationTable {
    ms: Vec<u32>,
}

impl DurationTable {
    /// Builds a table of exactly `frame_count` entries from raw delay metadata in
    /// hundredths of a second.
    ///
    /// - `None` or an empty slice: every frame gets [`DEFAULT_FRAME_DELAY_MS`].
    /// - Fewer entries than frames: the last entry repeats for the remaining frames.
    /// - Each entry converts to ms (`cs * 10`) and is floored at [`MIN_FRAME_DELAY_MS`].
    pub fn from_centiseconds(raw: Option<&[u32]>, frame_count: usize) -> Self {
        let raw = match raw {
            Some(r) if !r.is_empty() => r,
            _ => return Self::uniform(DEFAULT_FRAME_DELAY_MS, frame_count),
        };

        let last = raw[raw.len() - 1];
        let ms = (0..frame_count)
            .map(|i| {
                let cs = raw.get(i).copied().unwrap_or(last);
                cs.saturating_mul(10).max(MIN_FRAME_DELAY_MS)
            })
            .collect();
        Self { ms }
    }

    pub fn uniform(ms: u32, frame_count: usize) -> Self {
        Self {
            ms: vec![ms.max(MIN_FRAME_DELAY_MS); frame_count],
        }
    }

    pub fn len(&self) -> usize {
        self.ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ms.is_empty()
    }

    /// Delay for `index`, or the default when the index is past the end.
    pub fn delay_ms(&self, index: usize) -> u32 {
        self.ms.get(index).copied().unwrap_or(DEFAULT_FRAME_DELAY_MS)
    }

    pub fn delay(&self, index: usize) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms(index)))
    }

    pub fn as_millis(&self) -> &[u32] {
        &self.ms
    }

    /// Length of one full loop.
    pub fn total(&self) -> Duration {
        Duration::from_millis(self.ms.iter().map(|&m| u64::from(m)).sum())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/durations.rs"]
mod tests;

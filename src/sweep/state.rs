use crate::args::PositiveUsize;

/// Position of the sweep.
///
/// Levels run strictly in the configured order and trials strictly in
/// sequence; at most one trial is in progress at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Idle,
    RunningLevel {
        index: usize,
        concurrency: PositiveUsize,
    },
    /// `trial` is 1-based.
    RunningTrial {
        index: usize,
        concurrency: PositiveUsize,
        trial: usize,
    },
    LevelComplete {
        index: usize,
        concurrency: PositiveUsize,
    },
    Done,
}

impl SweepState {
    /// Advances one step over `levels` with `trials` trials per level.
    #[must_use]
    pub fn next(self, levels: &[PositiveUsize], trials: usize) -> Self {
        match self {
            SweepState::Idle => Self::level_at(levels, 0),
            SweepState::RunningLevel { index, concurrency } => {
                if trials == 0 {
                    SweepState::LevelComplete { index, concurrency }
                } else {
                    SweepState::RunningTrial {
                        index,
                        concurrency,
                        trial: 1,
                    }
                }
            }
            SweepState::RunningTrial {
                index,
                concurrency,
                trial,
            } => {
                if trial < trials {
                    SweepState::RunningTrial {
                        index,
                        concurrency,
                        trial: trial.saturating_add(1),
                    }
                } else {
                    SweepState::LevelComplete { index, concurrency }
                }
            }
            SweepState::LevelComplete { index, .. } => {
                Self::level_at(levels, index.saturating_add(1))
            }
            SweepState::Done => SweepState::Done,
        }
    }

    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, SweepState::Done)
    }

    fn level_at(levels: &[PositiveUsize], index: usize) -> Self {
        levels
            .get(index)
            .map_or(SweepState::Done, |concurrency| SweepState::RunningLevel {
                index,
                concurrency: *concurrency,
            })
    }
}

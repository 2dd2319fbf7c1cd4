//! Zoom-dependent caps on how many mines are handed to the renderer.
//!
//! Coarse zoom levels show the whole world at once, where thousands of
//! markers overlap; a [`RenderBudget`] keeps only a prefix of the view at
//! those levels. Truncation is a plain prefix, so repeated calls with the
//! same inputs always return the same mines.

use serde::{Deserialize, Serialize};

/// Errors from constructing a [`RenderBudget`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BudgetError {
    /// A tier boundary is NaN or infinite.
    #[error("tier boundary {below} is not finite")]
    NonFiniteBoundary {
        /// The offending boundary.
        below: f64,
    },

    /// Tier boundaries must strictly increase.
    #[error("tier boundaries must strictly increase ({previous} then {below})")]
    UnorderedBoundaries {
        /// Boundary of the earlier tier.
        previous: f64,
        /// Boundary of the later tier.
        below: f64,
    },

    /// A finer tier has a smaller limit than a coarser one.
    #[error("tier limits must not decrease ({previous} then {limit})")]
    DecreasingLimit {
        /// Limit of the earlier tier.
        previous: usize,
        /// Limit of the later tier.
        limit: usize,
    },
}

/// One step of the budget: detail levels below `below` show at most
/// `limit` mines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetTier {
    /// Exclusive upper bound on the detail level this tier covers.
    pub below: f64,
    /// Maximum number of mines at this tier.
    pub limit: usize,
}

/// A monotonically non-decreasing step function from detail level to
/// render cap. Detail levels at or above the last boundary are unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BudgetTier>", into = "Vec<BudgetTier>")]
pub struct RenderBudget {
    tiers: Vec<BudgetTier>,
}

impl Default for RenderBudget {
    /// Below zoom 4: 1000, below 6: 2500, below 8: 5000, then everything.
    fn default() -> Self {
        Self {
            tiers: vec![
                BudgetTier {
                    below: 4.0,
                    limit: 1000,
                },
                BudgetTier {
                    below: 6.0,
                    limit: 2500,
                },
                BudgetTier {
                    below: 8.0,
                    limit: 5000,
                },
            ],
        }
    }
}

impl RenderBudget {
    /// Builds a budget from tiers ordered coarsest first.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError`] if a boundary is not finite, boundaries do
    /// not strictly increase, or limits decrease.
    pub fn new(tiers: Vec<BudgetTier>) -> Result<Self, BudgetError> {
        for tier in &tiers {
            if !tier.below.is_finite() {
                return Err(BudgetError::NonFiniteBoundary { below: tier.below });
            }
        }
        for pair in tiers.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.below <= prev.below {
                return Err(BudgetError::UnorderedBoundaries {
                    previous: prev.below,
                    below: next.below,
                });
            }
            if next.limit < prev.limit {
                return Err(BudgetError::DecreasingLimit {
                    previous: prev.limit,
                    limit: next.limit,
                });
            }
        }
        Ok(Self { tiers })
    }

    /// A budget that never truncates.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { tiers: Vec::new() }
    }

    /// The tiers, coarsest first.
    #[must_use]
    pub fn tiers(&self) -> &[BudgetTier] {
        &self.tiers
    }

    /// Maximum number of mines at `detail`, or `None` for no limit.
    ///
    /// A NaN detail level is treated as the coarsest level.
    #[must_use]
    pub fn limit(&self, detail: f64) -> Option<usize> {
        if detail.is_nan() {
            return self.tiers.first().map(|t| t.limit);
        }
        self.tiers
            .iter()
            .find(|tier| detail < tier.below)
            .map(|tier| tier.limit)
    }

    /// The first `limit(detail)` items of `items`.
    #[must_use]
    pub fn cap<'s, T>(&self, items: &'s [T], detail: f64) -> &'s [T] {
        match self.limit(detail) {
            Some(limit) if limit < items.len() => {
                log::debug!(
                    "Render budget at detail {detail}: showing {limit} of {}",
                    items.len()
                );
                &items[..limit]
            }
            _ => items,
        }
    }
}

impl TryFrom<Vec<BudgetTier>> for RenderBudget {
    type Error = BudgetError;

    fn try_from(tiers: Vec<BudgetTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<RenderBudget> for Vec<BudgetTier> {
    fn from(budget: RenderBudget) -> Self {
        budget.tiers
    }
}

//! Carrier plans and deterministic bin selection.
//!
//! A [`Plan`] is a frozen recipe that maps `(seed, N)` to an ordered list of
//! frequency bins. Selection never consults hidden state: the same seed,
//! dimension and plan always produce the same [`CarrierSet`].
//!
//! # Eligible bins
//!
//! Only bins strictly between DC and Nyquist are addressable
//! (`1 <= k < N/2` for even N, `1 <= k <= (N-1)/2` for odd N), so every
//! carrier has a distinct negative-frequency mirror at `N - k`. A bin is
//! eligible when it is a multiple of the plan's `base` and its harmonic
//! number `k / base` is in the plan's [`HarmonicSet`].

use std::collections::BTreeMap;

use crate::error::{Result, SpectralError};
use crate::expander::{unit_f64, ByteStreamExpander, KeyBuilder};

const CARRIER_DOMAIN: &str = "spectral-carrier/carrier/v1";
const GOLDEN_DOMAIN: &str = "spectral-carrier/golden/v1";

/// The golden ratio, default step for [`Selection::GoldenStep`] plans.
pub const DEFAULT_PHI: f64 = 1.618_033_988_749_895;

/// Which harmonics of the base spacing are eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarmonicSet {
    /// Every harmonic.
    All,
    /// Harmonics `start..=end`.
    Range {
        /// First harmonic (inclusive).
        start: usize,
        /// Last harmonic (inclusive).
        end: usize,
    },
    /// An explicit list of harmonics.
    List(Vec<usize>),
}

impl HarmonicSet {
    /// Whether harmonic `h` is in the set.
    #[must_use]
    pub fn contains(&self, h: usize) -> bool {
        match self {
            HarmonicSet::All => true,
            HarmonicSet::Range { start, end } => (*start..=*end).contains(&h),
            HarmonicSet::List(list) => list.contains(&h),
        }
    }

    /// Number of harmonics, if finite and representable.
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        match self {
            HarmonicSet::All => None,
            HarmonicSet::Range { start, end } if end < start => Some(0),
            HarmonicSet::Range { start, end } => (end - start).checked_add(1),
            HarmonicSet::List(list) => {
                let mut unique = list.clone();
                unique.sort_unstable();
                unique.dedup();
                Some(unique.len())
            }
        }
    }
}

/// Rule for ordering the non-anchor carriers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Score every candidate bin with the expander; lowest scores win.
    Hashed,
    /// Seeded Weyl sequence with step `1/phi` over the candidate list,
    /// collisions resolved by linear probing. `None` takes `phi` from the
    /// codec configuration.
    GoldenStep {
        /// Step ratio override.
        phi: Option<f64>,
    },
    /// Lowest eligible bins in ascending order.
    Ascending,
}

/// A named carrier plan.
///
/// # Examples
///
/// ```
/// use spectral_carrier::carrier::Plan;
///
/// let plan = Plan::merkaba125_anchored();
/// assert_eq!(plan.name(), "merkaba125+3");
/// assert_eq!(plan.capacity(), 122);
/// assert_eq!(plan.cell(26), Some((1, 0, 1)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    name: String,
    base: usize,
    harmonics: HarmonicSet,
    carriers: usize,
    anchors: usize,
    gain: f64,
    selection: Selection,
    cube_side: Option<usize>,
}

impl Plan {
    /// 125 hashed carriers arranged as a 5x5x5 cube.
    #[must_use]
    pub fn merkaba125() -> Self {
        Self::hashed_cube("merkaba125", 5, 0)
    }

    /// `merkaba125` with the three lowest bins reserved as anchors.
    #[must_use]
    pub fn merkaba125_anchored() -> Self {
        Self::hashed_cube("merkaba125+3", 5, 3)
    }

    /// 27 hashed carriers arranged as a 3x3x3 cube.
    #[must_use]
    pub fn cube27() -> Self {
        Self::hashed_cube("cube27", 3, 0)
    }

    /// 64 carriers on a golden-ratio Weyl sequence, one anchor.
    #[must_use]
    pub fn golden64() -> Self {
        Self {
            name: "golden64".into(),
            base: 1,
            harmonics: HarmonicSet::All,
            carriers: 64,
            anchors: 1,
            gain: 1.0,
            selection: Selection::GoldenStep { phi: None },
            cube_side: None,
        }
    }

    fn hashed_cube(name: &str, side: usize, anchors: usize) -> Self {
        Self {
            name: name.into(),
            base: 1,
            harmonics: HarmonicSet::All,
            carriers: side * side * side,
            anchors,
            gain: 1.0,
            selection: Selection::Hashed,
            cube_side: Some(side),
        }
    }

    /// Plan built from a `(base, harmonics, gain)` tuple.
    ///
    /// Every harmonic in the set becomes a carrier, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` if the harmonic set is
    /// unbounded or empty, or if `base` or `gain` is unusable.
    pub fn custom(
        name: impl Into<String>,
        base: usize,
        harmonics: HarmonicSet,
        gain: f64,
    ) -> Result<Self> {
        let carriers = harmonics.count().ok_or_else(|| {
            SpectralError::InvalidConfig("custom plans need a bounded harmonic set".into())
        })?;
        let plan = Self {
            name: name.into(),
            base,
            harmonics,
            carriers,
            anchors: 0,
            gain,
            selection: Selection::Ascending,
            cube_side: None,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Reserve the lowest `anchors` eligible bins.
    #[must_use]
    pub fn with_anchors(mut self, anchors: usize) -> Self {
        self.anchors = anchors;
        self
    }

    /// Override the selection rule.
    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Override the carrier count.
    #[must_use]
    pub fn with_carriers(mut self, carriers: usize) -> Self {
        self.carriers = carriers;
        self
    }

    /// Attach a logical cube of side `side`.
    #[must_use]
    pub fn with_cube_side(mut self, side: usize) -> Self {
        self.cube_side = Some(side);
        self
    }

    /// Plan name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base bin spacing.
    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Eligible harmonics.
    #[must_use]
    pub fn harmonics(&self) -> &HarmonicSet {
        &self.harmonics
    }

    /// Total carrier count, anchors included.
    #[must_use]
    pub fn carriers(&self) -> usize {
        self.carriers
    }

    /// Number of anchor bins.
    #[must_use]
    pub fn anchors(&self) -> usize {
        self.anchors
    }

    /// Symbol capacity (carriers minus anchors).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.carriers.saturating_sub(self.anchors)
    }

    /// Embedding strength: time-domain cosine amplitude of a +1 symbol.
    #[must_use]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Selection rule.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Logical cube side, if any.
    #[must_use]
    pub fn cube_side(&self) -> Option<usize> {
        self.cube_side
    }

    /// Cube coordinates `(i / s^2, (i / s) % s, i % s)` of carrier `i`.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<(usize, usize, usize)> {
        let side = self.cube_side?;
        if index >= self.carriers {
            return None;
        }
        Some((index / (side * side), (index / side) % side, index % side))
    }

    /// Check the plan's parameters.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SpectralError::InvalidConfig("plan name must not be empty".into()));
        }
        if self.base == 0 {
            return Err(SpectralError::InvalidConfig("plan base must be >= 1".into()));
        }
        if self.anchors >= self.carriers {
            return Err(SpectralError::InvalidConfig(format!(
                "plan `{}` needs more carriers ({}) than anchors ({})",
                self.name, self.carriers, self.anchors
            )));
        }
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err(SpectralError::InvalidConfig(format!(
                "plan gain must be finite and positive, got {}",
                self.gain
            )));
        }
        if let Some(side) = self.cube_side {
            let cells = side.checked_mul(side).and_then(|sq| sq.checked_mul(side));
            if cells != Some(self.carriers) {
                return Err(SpectralError::InvalidConfig(format!(
                    "cube side {side} does not match {} carriers",
                    self.carriers
                )));
            }
        }
        if let Selection::GoldenStep { phi: Some(phi) } = self.selection {
            validate_phi(phi)?;
        }
        Ok(())
    }

    /// Eligible bins for dimension `dim`, ascending.
    #[must_use]
    pub fn eligible_bins(&self, dim: usize) -> Vec<usize> {
        let max_bin = max_carrier_bin(dim);
        (1..)
            .map(|h| h * self.base)
            .take_while(|&k| k <= max_bin)
            .filter(|&k| self.harmonics.contains(k / self.base))
            .collect()
    }

    /// Select this plan's carriers for `(seed, dim)`.
    ///
    /// `default_phi` is used by golden-step plans without their own ratio.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` for `dim == 0`,
    /// `SpectralError::InvalidConfig` for an invalid plan, and
    /// `SpectralError::InsufficientBins` if `dim` offers too few eligible
    /// bins.
    pub fn select(
        &self,
        dim: usize,
        seed: &str,
        expander: &dyn ByteStreamExpander,
        default_phi: f64,
    ) -> Result<CarrierSet> {
        if dim == 0 {
            return Err(SpectralError::InvalidDimension(dim));
        }
        self.validate()?;
        let eligible = self.eligible_bins(dim);
        if eligible.len() < self.carriers {
            return Err(SpectralError::InsufficientBins {
                plan: self.name.clone(),
                dim,
                required: self.carriers,
                available: eligible.len(),
            });
        }

        let (anchors, candidates) = eligible.split_at(self.anchors);
        let wanted = self.capacity();
        let data = match self.selection {
            Selection::Hashed => self.hashed(candidates, wanted, dim, seed, expander),
            Selection::GoldenStep { phi } => golden_step(
                candidates,
                wanted,
                unit_f64(expander.hash_u64(&self.key(GOLDEN_DOMAIN, seed, dim).finish())),
                phi.unwrap_or(default_phi),
            ),
            Selection::Ascending => candidates[..wanted].to_vec(),
        };

        tracing::debug!(
            "Selected {} carriers for plan {} at dim {} ({} eligible bins)",
            self.carriers,
            self.name,
            dim,
            eligible.len()
        );

        let mut bins = anchors.to_vec();
        bins.extend(data);
        Ok(CarrierSet {
            bins,
            anchors: self.anchors,
        })
    }

    fn key(&self, domain: &str, seed: &str, dim: usize) -> KeyBuilder {
        KeyBuilder::new(domain)
            .str(&self.name)
            .str(seed)
            .u64(dim as u64)
    }

    fn hashed(
        &self,
        candidates: &[usize],
        wanted: usize,
        dim: usize,
        seed: &str,
        expander: &dyn ByteStreamExpander,
    ) -> Vec<usize> {
        let prefix = self.key(CARRIER_DOMAIN, seed, dim);
        let mut scored: Vec<(u64, usize)> = candidates
            .iter()
            .map(|&bin| {
                let key = prefix.clone().u64(bin as u64).finish();
                (expander.hash_u64(&key), bin)
            })
            .collect();
        scored.sort_unstable();
        scored.into_iter().take(wanted).map(|(_, bin)| bin).collect()
    }
}

/// Weyl walk over `candidates`; the first free slot at or after each
/// position is taken.
fn golden_step(candidates: &[usize], wanted: usize, offset: f64, phi: f64) -> Vec<usize> {
    let m = candidates.len();
    let step = 1.0 / phi;
    let mut taken = vec![false; m];
    let mut out = Vec::with_capacity(wanted);
    for i in 0..wanted {
        let position = (offset + i as f64 * step).fract();
        let mut slot = ((position * m as f64) as usize).min(m - 1);
        while taken[slot] {
            slot = (slot + 1) % m;
        }
        taken[slot] = true;
        out.push(candidates[slot]);
    }
    out
}

/// Highest bin strictly below Nyquist.
pub(crate) fn max_carrier_bin(dim: usize) -> usize {
    if dim % 2 == 0 {
        (dim / 2).saturating_sub(1)
    } else {
        (dim - 1) / 2
    }
}

pub(crate) fn validate_phi(phi: f64) -> Result<()> {
    if !phi.is_finite() || phi <= 1.0 {
        return Err(SpectralError::InvalidConfig(format!(
            "phi must be finite and > 1, got {phi}"
        )));
    }
    Ok(())
}

/// Ordered carrier bins for one `(plan, seed, dim)`, anchors first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierSet {
    bins: Vec<usize>,
    anchors: usize,
}

impl CarrierSet {
    /// All carrier bins, anchors first.
    #[must_use]
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Anchor bins.
    #[must_use]
    pub fn anchors(&self) -> &[usize] {
        &self.bins[..self.anchors]
    }

    /// Data bins in symbol order.
    #[must_use]
    pub fn data(&self) -> &[usize] {
        &self.bins[self.anchors..]
    }

    /// Number of data bins.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bins.len() - self.anchors
    }

    /// Consume into `(bins, anchor_count)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<usize>, usize) {
        (self.bins, self.anchors)
    }
}

/// Name-indexed plan table.
///
/// Built-in plans are frozen; custom plans may be added under new names.
#[derive(Debug, Clone)]
pub struct PlanRegistry {
    plans: BTreeMap<String, Plan>,
}

impl PlanRegistry {
    /// Registry holding the built-in plans.
    #[must_use]
    pub fn builtin() -> Self {
        let plans = [
            Plan::merkaba125(),
            Plan::merkaba125_anchored(),
            Plan::cube27(),
            Plan::golden64(),
        ]
        .into_iter()
        .map(|plan| (plan.name.clone(), plan))
        .collect();
        Self { plans }
    }

    /// Look up a plan by name.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::UnknownPlan` if no plan has that name.
    pub fn get(&self, name: &str) -> Result<&Plan> {
        self.plans
            .get(name)
            .ok_or_else(|| SpectralError::UnknownPlan(name.to_string()))
    }

    /// Add a custom plan.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` if the plan is invalid or its
    /// name is already taken.
    pub fn register(&mut self, plan: Plan) -> Result<()> {
        plan.validate()?;
        if self.plans.contains_key(&plan.name) {
            return Err(SpectralError::InvalidConfig(format!(
                "plan `{}` is already registered",
                plan.name
            )));
        }
        self.plans.insert(plan.name.clone(), plan);
        Ok(())
    }

    /// Registered plan names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }
}

impl Default for PlanRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

//! Configuration for the binding engine, symbol generator and carrier codec.
//!
//! [`SpectralConfig`] gathers every tunable that would otherwise be a
//! process-wide constant: transform strategy, unbind regularization, the
//! expander, the symbol distribution, the golden-step ratio and the decode
//! zero band. It builds the configured components directly.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::carrier::codec::validate_zero_band;
use crate::carrier::plan::validate_phi;
use crate::carrier::{CarrierCodec, DEFAULT_PHI, DEFAULT_ZERO_BAND};
use crate::error::Result;
use crate::expander::{build_expander, ByteStreamExpander, ExpanderKind};
use crate::hrr::{validate_epsilon, BindingEngine, Regularization, DEFAULT_EPSILON};
use crate::symbol::{SymbolDistribution, SymbolVectorGenerator};
use crate::transform::{
    build_transform_with_threshold, SpectralTransform, TransformKind, DEFAULT_DFT_THRESHOLD,
};

/// Top-level configuration.
///
/// Missing JSON fields take their defaults.
///
/// # Example
///
/// ```
/// use spectral_carrier::config::SpectralConfig;
/// use spectral_carrier::transform::TransformKind;
///
/// let config = SpectralConfig::default()
///     .with_transform(TransformKind::Bluestein)
///     .with_zero_band(0.4);
/// assert!(config.validate().is_ok());
/// let codec = config.carrier_codec().unwrap();
/// assert_eq!(codec.zero_band(), 0.4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// Transform strategy.
    pub transform: TransformKind,

    /// Largest non-power-of-two size the auto strategy sends to the direct
    /// DFT.
    pub dft_threshold: usize,

    /// Unbind regularization epsilon.
    pub epsilon: f64,

    /// Unbind regularization mode.
    pub regularization: Regularization,

    /// Byte-stream expander for symbols and carrier selection.
    pub expander: ExpanderKind,

    /// Symbol vector distribution.
    pub distribution: SymbolDistribution,

    /// Step ratio for golden-step plans.
    pub phi: f64,

    /// Half-width of the normalized level band decoded as zero.
    pub zero_band: f64,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            transform: TransformKind::Auto,
            dft_threshold: DEFAULT_DFT_THRESHOLD,
            epsilon: DEFAULT_EPSILON,
            regularization: Regularization::Floor,
            expander: ExpanderKind::Sha256,
            distribution: SymbolDistribution::Normal,
            phi: DEFAULT_PHI,
            zero_band: DEFAULT_ZERO_BAND,
        }
    }
}

impl SpectralConfig {
    /// Set the transform strategy.
    #[must_use]
    pub const fn with_transform(mut self, transform: TransformKind) -> Self {
        self.transform = transform;
        self
    }

    /// Set the auto strategy's DFT threshold.
    #[must_use]
    pub const fn with_dft_threshold(mut self, threshold: usize) -> Self {
        self.dft_threshold = threshold;
        self
    }

    /// Set the unbind epsilon.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the unbind regularization mode.
    #[must_use]
    pub const fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = regularization;
        self
    }

    /// Set the expander.
    #[must_use]
    pub const fn with_expander(mut self, expander: ExpanderKind) -> Self {
        self.expander = expander;
        self
    }

    /// Set the symbol distribution.
    #[must_use]
    pub const fn with_distribution(mut self, distribution: SymbolDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the golden-step ratio.
    #[must_use]
    pub const fn with_phi(mut self, phi: f64) -> Self {
        self.phi = phi;
        self
    }

    /// Set the decode zero band.
    #[must_use]
    pub const fn with_zero_band(mut self, zero_band: f64) -> Self {
        self.zero_band = zero_band;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)?;
        validate_phi(self.phi)?;
        validate_zero_band(self.zero_band)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::Io` or `SpectralError::Json` if the file cannot
    /// be read or parsed, and `SpectralError::InvalidConfig` if it fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::Io` or `SpectralError::Json` on failure.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The configured transform.
    #[must_use]
    pub fn build_transform(&self) -> Arc<dyn SpectralTransform> {
        build_transform_with_threshold(self.transform, self.dft_threshold)
    }

    /// The configured expander.
    #[must_use]
    pub fn build_expander(&self) -> Arc<dyn ByteStreamExpander> {
        build_expander(self.expander)
    }

    /// A binding engine with the configured transform and regularization.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` if the configuration is invalid.
    pub fn binding_engine(&self) -> Result<BindingEngine> {
        self.validate()?;
        BindingEngine::new(self.build_transform())
            .with_regularization(self.regularization)
            .with_epsilon(self.epsilon)
    }

    /// A symbol generator of dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` for `dim == 0`.
    pub fn symbol_generator(&self, dim: usize) -> Result<SymbolVectorGenerator> {
        Ok(SymbolVectorGenerator::with_expander(dim, self.build_expander())?
            .with_distribution(self.distribution))
    }

    /// A carrier codec over the built-in plans.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` if the configuration is invalid.
    pub fn carrier_codec(&self) -> Result<CarrierCodec> {
        self.validate()?;
        CarrierCodec::new(self.build_transform(), self.build_expander())
            .with_phi(self.phi)?
            .with_zero_band(self.zero_band)
    }
}

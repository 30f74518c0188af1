//! Symbol streams on carrier bins.
//!
//! Each data carrier `k` holds one trit as the real coefficient
//! `trit * gain * N/2` (with its conjugate mirror at `N - k`), so a `+1`
//! contributes a time-domain cosine of amplitude `gain`. Decoding normalizes
//! the real part of each carrier back to a level in roughly `[-1, 1]` and
//! thresholds it against the zero band.
//!
//! ```text
//!   level:  -1 ........ -band ..... 0 ..... +band ........ +1
//!   trit:        N      |         Z          |      P
//! ```

use std::sync::Arc;

use num_complex::Complex64;

use crate::carrier::plan::validate_phi;
use crate::carrier::placeholder::{self, PlaceholderSpec};
use crate::carrier::{CarrierSet, Manifest, PayloadPacking, Plan, PlanRegistry, DEFAULT_PHI};
use crate::error::{Result, SpectralError};
use crate::expander::{ByteStreamExpander, Sha256Expander};
use crate::transform::{build_transform, SpectralTransform, TransformKind};
use crate::trit::Trit;
use crate::vector::{check_same_len, SpectralCoefficients, Vector};

/// Default half-width of the normalized level band decoded as zero.
pub const DEFAULT_ZERO_BAND: f64 = 0.5;

/// Levels this close to the band edge are logged as marginal.
const BOUNDARY_MARGIN: f64 = 0.05;

/// Where and how to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Vector dimension.
    pub dim: usize,
    /// Carrier selection seed.
    pub seed: String,
    /// Plan name.
    pub plan: String,
    /// Byte packing for binary payloads.
    pub packing: PayloadPacking,
}

impl EncodeOptions {
    /// Options with the default packing.
    pub fn new(dim: usize, seed: impl Into<String>, plan: impl Into<String>) -> Self {
        Self {
            dim,
            seed: seed.into(),
            plan: plan.into(),
            packing: PayloadPacking::default(),
        }
    }

    /// Set the byte packing.
    #[must_use]
    pub fn with_packing(mut self, packing: PayloadPacking) -> Self {
        self.packing = packing;
        self
    }
}

/// Where and how much to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Vector dimension.
    pub dim: usize,
    /// Carrier selection seed.
    pub seed: String,
    /// Plan name.
    pub plan: String,
    /// Number of symbols to read.
    pub count: usize,
    /// Byte packing for binary payloads.
    pub packing: PayloadPacking,
}

impl DecodeOptions {
    /// Options reading `count` symbols.
    pub fn new(
        dim: usize,
        seed: impl Into<String>,
        plan: impl Into<String>,
        count: usize,
    ) -> Self {
        Self {
            dim,
            seed: seed.into(),
            plan: plan.into(),
            count,
            packing: PayloadPacking::default(),
        }
    }

    /// Set the byte packing.
    #[must_use]
    pub fn with_packing(mut self, packing: PayloadPacking) -> Self {
        self.packing = packing;
        self
    }

    /// Read enough symbols for `bytes` payload bytes under the current packing.
    #[must_use]
    pub fn with_payload_len(mut self, bytes: usize) -> Self {
        self.count = self.packing.symbols_for(bytes);
        self
    }
}

impl From<&Manifest> for DecodeOptions {
    fn from(manifest: &Manifest) -> Self {
        Self {
            dim: manifest.dim,
            seed: manifest.seed.clone(),
            plan: manifest.plan.clone(),
            count: manifest.symbol_count,
            packing: manifest.packing.unwrap_or_default(),
        }
    }
}

/// Carrier-plan encoder/decoder.
///
/// # Examples
///
/// ```
/// use spectral_carrier::carrier::{CarrierCodec, DecodeOptions, EncodeOptions};
/// use spectral_carrier::trit::parse_trits;
///
/// let codec = CarrierCodec::default();
/// let trits = parse_trits("+-0+").unwrap();
/// let (vector, manifest) = codec
///     .encode_trits(&trits, &EncodeOptions::new(1024, "demo", "cube27"))
///     .unwrap();
///
/// let decoded = codec
///     .decode_trits(&vector, &DecodeOptions::new(1024, "demo", "cube27", 4))
///     .unwrap();
/// assert_eq!(decoded, trits);
/// assert_eq!(codec.decode_with_manifest(&vector, &manifest).unwrap(), trits);
/// ```
#[derive(Debug, Clone)]
pub struct CarrierCodec {
    transform: Arc<dyn SpectralTransform>,
    expander: Arc<dyn ByteStreamExpander>,
    registry: PlanRegistry,
    phi: f64,
    zero_band: f64,
}

impl Default for CarrierCodec {
    fn default() -> Self {
        Self::new(build_transform(TransformKind::Auto), Arc::new(Sha256Expander))
    }
}

impl CarrierCodec {
    /// Codec over the built-in plans.
    #[must_use]
    pub fn new(
        transform: Arc<dyn SpectralTransform>,
        expander: Arc<dyn ByteStreamExpander>,
    ) -> Self {
        Self {
            transform,
            expander,
            registry: PlanRegistry::builtin(),
            phi: DEFAULT_PHI,
            zero_band: DEFAULT_ZERO_BAND,
        }
    }

    /// Replace the plan registry.
    #[must_use]
    pub fn with_registry(mut self, registry: PlanRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the ratio used by golden-step plans.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` unless `phi` is finite and > 1.
    pub fn with_phi(mut self, phi: f64) -> Result<Self> {
        validate_phi(phi)?;
        self.phi = phi;
        Ok(self)
    }

    /// Set the zero band half-width.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` unless `zero_band` is in `(0, 1)`.
    pub fn with_zero_band(mut self, zero_band: f64) -> Result<Self> {
        validate_zero_band(zero_band)?;
        self.zero_band = zero_band;
        Ok(self)
    }

    /// Add a custom plan.
    ///
    /// # Errors
    ///
    /// See [`PlanRegistry::register`].
    pub fn register_plan(&mut self, plan: Plan) -> Result<()> {
        self.registry.register(plan)
    }

    /// Registered plans.
    #[must_use]
    pub fn registry(&self) -> &PlanRegistry {
        &self.registry
    }

    /// Zero band half-width.
    #[must_use]
    pub fn zero_band(&self) -> f64 {
        self.zero_band
    }

    /// Golden-step ratio.
    #[must_use]
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Expander used for carrier selection.
    #[must_use]
    pub fn expander(&self) -> &Arc<dyn ByteStreamExpander> {
        &self.expander
    }

    /// Carrier bins of `plan` for `(seed, dim)`, anchors first.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::UnknownPlan`, `SpectralError::InvalidDimension`
    /// or `SpectralError::InsufficientBins`.
    pub fn plan_bins(&self, dim: usize, seed: &str, plan: &str) -> Result<Vec<usize>> {
        let (_, carriers) = self.resolve(dim, seed, plan)?;
        Ok(carriers.into_parts().0)
    }

    /// Full carrier selection for `(seed, dim)`.
    ///
    /// # Errors
    ///
    /// Same as [`CarrierCodec::plan_bins`].
    pub fn carriers(&self, dim: usize, seed: &str, plan: &str) -> Result<CarrierSet> {
        Ok(self.resolve(dim, seed, plan)?.1)
    }

    /// Encode trits onto an otherwise empty spectrum.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::PayloadTooLarge` if `trits` exceeds the plan's
    /// capacity, plus any plan resolution error.
    pub fn encode_trits(
        &self,
        trits: &[Trit],
        opts: &EncodeOptions,
    ) -> Result<(Vector, Manifest)> {
        let spectrum = SpectralCoefficients::zeros(opts.dim)?;
        self.encode_spectrum(spectrum.into_inner(), trits, opts)
    }

    /// Encode trits onto `base`, replacing its carrier and anchor bins and
    /// keeping every other bin.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if `base` is not
    /// `opts.dim` long, plus the errors of [`CarrierCodec::encode_trits`].
    pub fn encode_trits_onto(
        &self,
        base: &Vector,
        trits: &[Trit],
        opts: &EncodeOptions,
    ) -> Result<(Vector, Manifest)> {
        check_same_len(opts.dim, base.len())?;
        let spectrum = self.transform.forward(base)?;
        self.encode_spectrum(spectrum.into_inner(), trits, opts)
    }

    /// Decode `opts.count` trits.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if the vector is not
    /// `opts.dim` long and `SpectralError::PayloadTooLarge` if `opts.count`
    /// exceeds the plan's capacity.
    pub fn decode_trits(&self, vector: &Vector, opts: &DecodeOptions) -> Result<Vec<Trit>> {
        check_same_len(opts.dim, vector.len())?;
        let (plan, carriers) = self.resolve(opts.dim, &opts.seed, &opts.plan)?;
        self.decode_bins(vector, plan.gain(), carriers.data(), opts.count)
    }

    /// Decode using a manifest, after checking that its carriers match a
    /// fresh selection.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::ManifestMismatch` if the manifest disagrees
    /// with this codec's plan, expander or carrier selection.
    pub fn decode_with_manifest(&self, vector: &Vector, manifest: &Manifest) -> Result<Vec<Trit>> {
        self.verify(vector, manifest)?;
        self.decode_bins(
            vector,
            manifest.gain,
            manifest.data_bins(),
            manifest.symbol_count,
        )
    }

    /// Normalized level of every data carrier, in symbol order.
    ///
    /// Levels within a small margin of the zero band edge are logged at
    /// `warn`.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if the vector is not
    /// `opts.dim` long, plus any plan resolution error.
    pub fn carrier_levels(&self, vector: &Vector, opts: &DecodeOptions) -> Result<Vec<f64>> {
        check_same_len(opts.dim, vector.len())?;
        let (plan, carriers) = self.resolve(opts.dim, &opts.seed, &opts.plan)?;
        self.levels(vector, plan.gain(), carriers.data())
    }

    /// Remove the manifest's carrier and anchor bins, leaving whatever else
    /// was superposed on the vector.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::ManifestMismatch` or
    /// `SpectralError::DimensionMismatch` if the manifest does not describe
    /// this vector.
    pub fn strip_carriers(&self, vector: &Vector, manifest: &Manifest) -> Result<Vector> {
        self.verify(vector, manifest)?;
        let mut bins = self.transform.forward(vector)?.into_inner();
        for &bin in &manifest.carriers {
            set_bin(&mut bins, bin, Complex64::new(0.0, 0.0));
        }
        self.transform.inverse(&SpectralCoefficients::new(bins)?)
    }

    /// Render placeholder components with this codec's transform.
    ///
    /// The result is a natural `base` for [`CarrierCodec::encode_trits_onto`].
    ///
    /// # Errors
    ///
    /// See [`placeholder::render_placeholders`].
    pub fn render_placeholders(
        &self,
        specs: &[PlaceholderSpec],
        dim: usize,
        base: usize,
    ) -> Result<Vector> {
        placeholder::render_placeholders(specs, dim, base, self.transform.as_ref())
    }

    /// Pack a byte payload with `opts.packing` and encode it.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::PayloadTooLarge` (measured in symbols) if the
    /// packed payload exceeds the plan's capacity.
    pub fn encode_binary_to_vector(
        &self,
        payload: &[u8],
        opts: &EncodeOptions,
    ) -> Result<(Vector, Manifest)> {
        let (vector, mut manifest) = self.encode_trits(&opts.packing.pack(payload), opts)?;
        manifest.packing = Some(opts.packing);
        Ok((vector, manifest))
    }

    /// Pack a byte payload and encode it onto `base`.
    ///
    /// # Errors
    ///
    /// Same as [`CarrierCodec::encode_trits_onto`].
    pub fn encode_binary_onto(
        &self,
        base: &Vector,
        payload: &[u8],
        opts: &EncodeOptions,
    ) -> Result<(Vector, Manifest)> {
        let (vector, mut manifest) =
            self.encode_trits_onto(base, &opts.packing.pack(payload), opts)?;
        manifest.packing = Some(opts.packing);
        Ok((vector, manifest))
    }

    /// Decode `opts.count` symbols and unpack them with `opts.packing`.
    ///
    /// # Errors
    ///
    /// The errors of [`CarrierCodec::decode_trits`], plus
    /// `SpectralError::InvalidConfig` if `opts.count` is not a whole number
    /// of bytes and `SpectralError::InvalidValue` if a symbol group does
    /// not decode to a byte.
    pub fn decode_vector_to_binary(
        &self,
        vector: &Vector,
        opts: &DecodeOptions,
    ) -> Result<Vec<u8>> {
        let trits = self.decode_trits(vector, opts)?;
        opts.packing.unpack(&trits)
    }

    /// Decode a binary payload using its manifest.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::ManifestMismatch` if the manifest records no
    /// packing, plus the errors of [`CarrierCodec::decode_with_manifest`].
    pub fn decode_binary_with_manifest(
        &self,
        vector: &Vector,
        manifest: &Manifest,
    ) -> Result<Vec<u8>> {
        let packing = manifest.packing.ok_or_else(|| {
            SpectralError::ManifestMismatch("manifest does not describe a binary payload".into())
        })?;
        packing.unpack(&self.decode_with_manifest(vector, manifest)?)
    }

    fn resolve(&self, dim: usize, seed: &str, plan: &str) -> Result<(&Plan, CarrierSet)> {
        let plan = self.registry.get(plan)?;
        let carriers = plan.select(dim, seed, self.expander.as_ref(), self.phi)?;
        Ok((plan, carriers))
    }

    fn encode_spectrum(
        &self,
        mut bins: Vec<Complex64>,
        trits: &[Trit],
        opts: &EncodeOptions,
    ) -> Result<(Vector, Manifest)> {
        let (plan, carriers) = self.resolve(opts.dim, &opts.seed, &opts.plan)?;
        if trits.len() > carriers.capacity() {
            return Err(SpectralError::PayloadTooLarge {
                requested: trits.len(),
                capacity: carriers.capacity(),
            });
        }

        // Anchors and unused data carriers stay at zero.
        for &bin in carriers.bins() {
            set_bin(&mut bins, bin, Complex64::new(0.0, 0.0));
        }
        let scale = plan.gain() * opts.dim as f64 / 2.0;
        for (&bin, &trit) in carriers.data().iter().zip(trits) {
            set_bin(&mut bins, bin, Complex64::new(trit.level() * scale, 0.0));
        }
        let vector = self.transform.inverse(&SpectralCoefficients::new(bins)?)?;

        tracing::debug!(
            "Encoded {} symbols on plan {} at dim {} (capacity {})",
            trits.len(),
            plan.name(),
            opts.dim,
            carriers.capacity()
        );

        let (carrier_bins, anchors) = carriers.into_parts();
        let manifest = Manifest {
            plan: plan.name().to_string(),
            dim: opts.dim,
            seed: opts.seed.clone(),
            carriers: carrier_bins,
            anchors,
            symbol_count: trits.len(),
            gain: plan.gain(),
            expander: self.expander.name().to_string(),
            packing: None,
        };
        Ok((vector, manifest))
    }

    fn decode_bins(
        &self,
        vector: &Vector,
        gain: f64,
        data: &[usize],
        count: usize,
    ) -> Result<Vec<Trit>> {
        if count > data.len() {
            return Err(SpectralError::PayloadTooLarge {
                requested: count,
                capacity: data.len(),
            });
        }
        let levels = self.levels(vector, gain, &data[..count])?;
        Ok(levels
            .into_iter()
            .map(|level| Trit::from_level(level, self.zero_band))
            .collect())
    }

    fn levels(&self, vector: &Vector, gain: f64, bins: &[usize]) -> Result<Vec<f64>> {
        let spectrum = self.transform.forward(vector)?;
        let scale = gain * vector.len() as f64 / 2.0;
        let mut levels = Vec::with_capacity(bins.len());
        for (i, &bin) in bins.iter().enumerate() {
            let coefficient = spectrum.get(bin).ok_or(SpectralError::DimensionMismatch {
                expected: bin + 1,
                actual: vector.len(),
            })?;
            let level = coefficient.re / scale;
            if (level.abs() - self.zero_band).abs() < BOUNDARY_MARGIN {
                tracing::warn!(
                    "Carrier {} (bin {}) level {:.3} is near the zero band edge {}",
                    i,
                    bin,
                    level,
                    self.zero_band
                );
            }
            levels.push(level);
        }
        tracing::trace!("Read {} carrier levels", levels.len());
        Ok(levels)
    }

    fn verify(&self, vector: &Vector, manifest: &Manifest) -> Result<()> {
        check_same_len(manifest.dim, vector.len())?;
        if manifest.expander != self.expander.name() {
            return Err(SpectralError::ManifestMismatch(format!(
                "manifest expander `{}` differs from codec expander `{}`",
                manifest.expander,
                self.expander.name()
            )));
        }
        let (plan, carriers) = self.resolve(manifest.dim, &manifest.seed, &manifest.plan)?;
        if carriers.bins() != manifest.carriers.as_slice()
            || carriers.anchors().len() != manifest.anchors
        {
            return Err(SpectralError::ManifestMismatch(format!(
                "carrier list does not match plan `{}` for seed {:?} at dim {}",
                manifest.plan, manifest.seed, manifest.dim
            )));
        }
        if (manifest.gain - plan.gain()).abs() > 1e-12 * plan.gain() {
            return Err(SpectralError::ManifestMismatch(format!(
                "manifest gain {} differs from plan gain {}",
                manifest.gain,
                plan.gain()
            )));
        }
        if manifest.symbol_count > carriers.capacity() {
            return Err(SpectralError::ManifestMismatch(format!(
                "manifest claims {} symbols but plan `{}` holds {}",
                manifest.symbol_count,
                manifest.plan,
                carriers.capacity()
            )));
        }
        Ok(())
    }
}

/// Write `value` at `bin` and its conjugate at the mirror bin.
fn set_bin(bins: &mut [Complex64], bin: usize, value: Complex64) {
    let n = bins.len();
    bins[bin] = value;
    bins[(n - bin) % n] = value.conj();
}

pub(crate) fn validate_zero_band(zero_band: f64) -> Result<()> {
    if !(zero_band > 0.0 && zero_band < 1.0) {
        return Err(SpectralError::InvalidConfig(format!(
            "zero band must be in (0, 1), got {zero_band}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expander::ChaChaExpander;
    use crate::trit::parse_trits;

    fn cycle(len: usize) -> Vec<Trit> {
        (0..len).map(|i| Trit::ALL[i % 3]).collect()
    }

    #[test]
    fn test_trit_round_trip_odd_dimension() {
        let codec = CarrierCodec::default();
        let trits = cycle(27);
        let (v, manifest) = codec
            .encode_trits(&trits, &EncodeOptions::new(999, "odd", "cube27"))
            .unwrap();
        assert_eq!(v.len(), 999);
        assert_eq!(manifest.symbol_count, 27);
        let out = codec
            .decode_trits(&v, &DecodeOptions::new(999, "odd", "cube27", 27))
            .unwrap();
        assert_eq!(out, trits);
    }

    #[test]
    fn test_short_stream_leaves_trailing_carriers_zero() {
        let codec = CarrierCodec::default();
        let trits = parse_trits("++--").unwrap();
        let (v, _) = codec
            .encode_trits(&trits, &EncodeOptions::new(512, "s", "cube27"))
            .unwrap();
        let all = codec
            .decode_trits(&v, &DecodeOptions::new(512, "s", "cube27", 27))
            .unwrap();
        assert_eq!(&all[..4], trits.as_slice());
        assert!(all[4..].iter().all(|t| t.is_zero()));
    }

    #[test]
    fn test_carrier_cosine_amplitude() {
        let codec = CarrierCodec::default();
        let (v, manifest) = codec
            .encode_trits(&[Trit::P], &EncodeOptions::new(256, "amp", "cube27"))
            .unwrap();
        let k = manifest.data_bins()[0] as f64;
        for (j, x) in v.iter().enumerate() {
            let expected = (2.0 * std::f64::consts::PI * k * j as f64 / 256.0).cos();
            assert!((x - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_anchors_forced_to_zero() {
        let codec = CarrierCodec::default();
        let dim = 1024;
        let base = crate::symbol::SymbolVectorGenerator::new(dim)
            .unwrap()
            .generate("noise", &[])
            .unwrap();
        let opts = EncodeOptions::new(dim, "a", "merkaba125+3");
        let (v, manifest) = codec.encode_trits_onto(&base, &cycle(122), &opts).unwrap();
        let spectrum = build_transform(TransformKind::Auto).forward(&v).unwrap();
        for &bin in manifest.anchor_bins() {
            assert!(spectrum.get(bin).unwrap().norm() < 1e-9);
        }
        assert_eq!(
            codec.decode_with_manifest(&v, &manifest).unwrap(),
            cycle(122)
        );
    }

    #[test]
    fn test_levels_are_unit() {
        let codec = CarrierCodec::default();
        let trits = parse_trits("+-0").unwrap();
        let (v, _) = codec
            .encode_trits(&trits, &EncodeOptions::new(128, "l", "cube27"))
            .unwrap();
        let levels = codec
            .carrier_levels(&v, &DecodeOptions::new(128, "l", "cube27", 0))
            .unwrap();
        assert_eq!(levels.len(), 27);
        assert!((levels[0] - 1.0).abs() < 1e-12);
        assert!((levels[1] + 1.0).abs() < 1e-12);
        assert!(levels[2..].iter().all(|l| l.abs() < 1e-12));
    }

    #[test]
    fn test_zero_band_controls_threshold() {
        let codec = CarrierCodec::default();
        let (v, manifest) = codec
            .encode_trits(&[Trit::P, Trit::N], &EncodeOptions::new(256, "z", "cube27"))
            .unwrap();
        let halved = v.scale(0.3);
        assert_eq!(
            codec.decode_with_manifest(&halved, &manifest).unwrap(),
            vec![Trit::Z, Trit::Z]
        );
        let loose = CarrierCodec::default().with_zero_band(0.2).unwrap();
        assert_eq!(
            loose.decode_with_manifest(&halved, &manifest).unwrap(),
            vec![Trit::P, Trit::N]
        );
        assert!(CarrierCodec::default().with_zero_band(1.0).is_err());
        assert!(CarrierCodec::default().with_zero_band(0.0).is_err());
        assert!(CarrierCodec::default().with_zero_band(f64::NAN).is_err());
    }

    #[test]
    fn test_payload_too_large() {
        let codec = CarrierCodec::default();
        let err = codec
            .encode_trits(&cycle(28), &EncodeOptions::new(256, "x", "cube27"))
            .unwrap_err();
        assert!(matches!(
            err,
            SpectralError::PayloadTooLarge {
                requested: 28,
                capacity: 27
            }
        ));
        let v = Vector::zeros(256).unwrap();
        assert!(matches!(
            codec.decode_trits(&v, &DecodeOptions::new(256, "x", "cube27", 28)),
            Err(SpectralError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_manifest_mismatch() {
        let codec = CarrierCodec::default();
        let (v, manifest) = codec
            .encode_trits(&cycle(5), &EncodeOptions::new(512, "m", "merkaba125"))
            .unwrap();

        let mut wrong_plan = manifest.clone();
        wrong_plan.plan = "merkaba125+3".into();
        assert!(matches!(
            codec.decode_with_manifest(&v, &wrong_plan),
            Err(SpectralError::ManifestMismatch(_))
        ));

        let mut wrong_seed = manifest.clone();
        wrong_seed.seed = "n".into();
        assert!(codec.decode_with_manifest(&v, &wrong_seed).is_err());

        let mut wrong_gain = manifest.clone();
        wrong_gain.gain = 2.0;
        assert!(codec.decode_with_manifest(&v, &wrong_gain).is_err());

        let chacha = CarrierCodec::new(
            build_transform(TransformKind::Auto),
            Arc::new(ChaChaExpander),
        );
        assert!(matches!(
            chacha.decode_with_manifest(&v, &manifest),
            Err(SpectralError::ManifestMismatch(_))
        ));

        assert!(codec.decode_binary_with_manifest(&v, &manifest).is_err());
    }

    #[test]
    fn test_strip_carriers_recovers_base() {
        let codec = CarrierCodec::default();
        let dim = 600;
        let base = crate::symbol::SymbolVectorGenerator::new(dim)
            .unwrap()
            .generate("base", &[])
            .unwrap();
        let opts = EncodeOptions::new(dim, "strip", "cube27");
        let (encoded, manifest) = codec.encode_trits_onto(&base, &cycle(27), &opts).unwrap();
        let stripped = codec.strip_carriers(&encoded, &manifest).unwrap();
        let expected = codec.strip_carriers(&base, &manifest).unwrap();
        assert!(stripped.rmse(&expected).unwrap() < 1e-12);
        // Only 27 of 299 positive bins were touched.
        assert!(stripped.rmse(&base).unwrap() < 0.5);
    }

    #[test]
    fn test_binary_round_trip_both_packings() {
        let codec = CarrierCodec::default();
        for packing in [PayloadPacking::Balanced, PayloadPacking::Bits] {
            let opts = EncodeOptions::new(2048, "bin", "merkaba125").with_packing(packing);
            let (v, manifest) = codec.encode_binary_to_vector(b"hi!", &opts).unwrap();
            assert_eq!(manifest.packing, Some(packing));
            assert_eq!(manifest.payload_len(), Some(3));
            assert_eq!(codec.decode_binary_with_manifest(&v, &manifest).unwrap(), b"hi!");

            let decode = DecodeOptions::new(2048, "bin", "merkaba125", 0)
                .with_packing(packing)
                .with_payload_len(3);
            assert_eq!(codec.decode_vector_to_binary(&v, &decode).unwrap(), b"hi!");
        }
    }

    #[test]
    fn test_golden_plan_uses_codec_phi() {
        let codec = CarrierCodec::default();
        let other = CarrierCodec::default().with_phi(2.0).unwrap();
        assert_ne!(
            codec.plan_bins(1024, "g", "golden64").unwrap(),
            other.plan_bins(1024, "g", "golden64").unwrap()
        );
        assert!(CarrierCodec::default().with_phi(0.5).is_err());
    }

    #[test]
    fn test_custom_plan() {
        let mut codec = CarrierCodec::default();
        let plan = Plan::custom(
            "octave",
            8,
            crate::carrier::HarmonicSet::Range { start: 1, end: 12 },
            0.25,
        )
        .unwrap();
        codec.register_plan(plan).unwrap();
        assert_eq!(
            codec.plan_bins(256, "any", "octave").unwrap(),
            (1..=12).map(|h| h * 8).collect::<Vec<_>>()
        );
        let trits = cycle(12);
        let (v, manifest) = codec
            .encode_trits(&trits, &EncodeOptions::new(256, "any", "octave"))
            .unwrap();
        assert!((manifest.gain - 0.25).abs() < f64::EPSILON);
        assert_eq!(codec.decode_with_manifest(&v, &manifest).unwrap(), trits);
    }

    #[test]
    fn test_errors() {
        let codec = CarrierCodec::default();
        assert!(matches!(
            codec.plan_bins(1024, "s", "nope"),
            Err(SpectralError::UnknownPlan(_))
        ));
        assert!(matches!(
            codec.plan_bins(100, "s", "merkaba125"),
            Err(SpectralError::InsufficientBins { .. })
        ));
        assert!(matches!(
            codec.encode_trits(&[], &EncodeOptions::new(0, "s", "cube27")),
            Err(SpectralError::InvalidDimension(0))
        ));
        let v = Vector::zeros(64).unwrap();
        assert!(matches!(
            codec.decode_trits(&v, &DecodeOptions::new(128, "s", "cube27", 1)),
            Err(SpectralError::DimensionMismatch { .. })
        ));
        assert!(codec
            .encode_trits_onto(&v, &[], &EncodeOptions::new(128, "s", "cube27"))
            .is_err());
    }

    #[test]
    fn test_render_placeholders_uses_codec_transform() {
        let specs = crate::carrier::parse_placeholders("k:5:0.5,range:7..=9:0.2").unwrap();
        let dft = CarrierCodec::new(build_transform(TransformKind::Dft), Arc::new(Sha256Expander));
        let bluestein = CarrierCodec::new(
            build_transform(TransformKind::Bluestein),
            Arc::new(Sha256Expander),
        );
        let a = dft.render_placeholders(&specs, 90, 2).unwrap();
        let b = bluestein.render_placeholders(&specs, 90, 2).unwrap();
        assert!(a.rmse(&b).unwrap() < 1e-12);

        // Radix-2 only handles powers of two, so the codec's choice shows.
        let radix2 =
            CarrierCodec::new(build_transform(TransformKind::Radix2), Arc::new(Sha256Expander));
        assert!(matches!(
            radix2.render_placeholders(&specs, 90, 2),
            Err(SpectralError::UnsupportedDimension { dim: 90, .. })
        ));
        let base = radix2.render_placeholders(&specs, 128, 2).unwrap();
        let trits = cycle(27);
        let (v, manifest) = radix2
            .encode_trits_onto(&base, &trits, &EncodeOptions::new(128, "p", "cube27"))
            .unwrap();
        assert_eq!(radix2.decode_with_manifest(&v, &manifest).unwrap(), trits);
    }
}

// crates/csp-json-core/src/generate.rs
// ============================================================================
// Module: Random CSP Generator
// Description: Uniform random binary CSP instances (model B, "urbcsp").
// Purpose: Produce reproducible benchmark documents from a seed.
// Dependencies: serde, serde_json, thiserror, crate::model
// ============================================================================

//! ## Overview
//! Model B picks exactly `constraints` distinct variable pairs and, for each,
//! exactly `nogoods` distinct forbidden value pairs. Selection is a partial
//! Fisher-Yates shuffle driven by the Numerical Recipes `ran2` generator, so
//! a given seed yields the same instances as the classic `urbcsp` tool.
//!
//! Instances generated in one call share one random sequence: instance `k`
//! continues where instance `k - 1` stopped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::model::Constraint;
use crate::model::Document;
use crate::model::DocumentError;
use crate::model::Domain;
use crate::model::Meta;
use crate::model::Relation;
use crate::model::TupleSet;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Largest accepted variable count.
pub const MAX_VARIABLES: usize = 65_536;
/// Largest accepted domain size.
pub const MAX_VALUES: usize = 65_535;
/// Value of `meta.algo` on generated documents.
pub const GENERATOR_ALGO: &str = "urbcsp";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Variable count outside `2..=MAX_VARIABLES`.
    #[error("illegal variable count {0}: must be between 2 and {MAX_VARIABLES}")]
    Variables(usize),
    /// Domain size outside `2..=MAX_VALUES`.
    #[error("illegal domain size {0}: must be between 2 and {MAX_VALUES}")]
    Values(usize),
    /// More constraints than distinct variable pairs.
    #[error("illegal constraint count {constraints}: at most {max} variable pairs exist")]
    Constraints {
        /// Requested constraint count.
        constraints: usize,
        /// Number of distinct variable pairs.
        max: usize,
    },
    /// Nogood count outside `1..=values^2 - 1`.
    #[error("illegal nogood count {nogoods}: must be between 1 and {max}")]
    Nogoods {
        /// Requested nogoods per constraint.
        nogoods: usize,
        /// Largest legal nogood count.
        max: usize,
    },
    /// Generator parameters could not be encoded into `meta.params`.
    #[error("failed to encode generator parameters: {0}")]
    Encode(String),
    /// Generated document violated a model invariant.
    #[error("generated document is invalid: {0}")]
    Document(#[from] DocumentError),
}

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Parameters of the model B generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UrbcspParams {
    /// Number of variables (`N`).
    pub variables: usize,
    /// Domain size shared by every variable (`D`).
    pub values: usize,
    /// Number of binary constraints (`C`).
    pub constraints: usize,
    /// Forbidden value pairs per constraint (`T`).
    pub nogoods: usize,
    /// Seed; positive values are negated to start a fresh sequence.
    pub seed: i32,
}

impl UrbcspParams {
    /// Returns the number of distinct unordered variable pairs.
    #[must_use]
    pub const fn possible_constraints(&self) -> usize {
        self.variables * (self.variables.saturating_sub(1)) / 2
    }

    /// Returns the number of value pairs per constraint.
    #[must_use]
    pub const fn possible_nogoods(&self) -> usize {
        self.values * self.values
    }

    /// Checks the parameters against the model limits.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] naming the first illegal parameter.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if !(2 ..= MAX_VARIABLES).contains(&self.variables) {
            return Err(GenerateError::Variables(self.variables));
        }
        if !(2 ..= MAX_VALUES).contains(&self.values) {
            return Err(GenerateError::Values(self.values));
        }
        let max = self.possible_constraints();
        if self.constraints > max {
            return Err(GenerateError::Constraints {
                constraints: self.constraints,
                max,
            });
        }
        let max = self.possible_nogoods() - 1;
        if !(1 ..= max).contains(&self.nogoods) {
            return Err(GenerateError::Nogoods {
                nogoods: self.nogoods,
                max,
            });
        }
        Ok(())
    }
}

/// Parameters recorded in `meta.params` of each generated instance.
#[derive(Debug, Serialize)]
struct InstanceParams {
    /// Number of variables.
    vars: usize,
    /// Domain size.
    vals: usize,
    /// Number of constraints.
    constraints: usize,
    /// Nogoods per constraint.
    nogoods: usize,
    /// Seed as given by the caller.
    seed: i32,
    /// Zero-based instance number within the sequence.
    instance: usize,
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates `count` consecutive instances from one random sequence.
///
/// # Errors
///
/// Returns [`GenerateError`] when the parameters are illegal.
pub fn generate_instances(
    params: &UrbcspParams,
    count: usize,
) -> Result<Vec<Document>, GenerateError> {
    params.validate()?;
    let mut rng = Ran2::new(params.seed);
    (0 .. count).map(|instance| generate_instance(params, instance, &mut rng)).collect()
}

/// Generates one instance, advancing `rng`.
fn generate_instance(
    params: &UrbcspParams,
    instance: usize,
    rng: &mut Ran2,
) -> Result<Document, GenerateError> {
    let possible_constraints = params.possible_constraints();
    let possible_nogoods = params.possible_nogoods();
    let mut pairs = SparseShuffle::default();
    let mut relations = Vec::with_capacity(params.constraints);
    let mut constraints = Vec::with_capacity(params.constraints);

    for index in 0 .. params.constraints {
        let picked = pick_index(rng.next_f32(), index, possible_constraints);
        let (first, second) = variable_pair(pairs.take(index, picked), params.variables);

        let mut value_pairs = SparseShuffle::default();
        let mut tuples = Vec::with_capacity(params.nogoods);
        for slot in 0 .. params.nogoods {
            let picked = pick_index(rng.next_f32(), slot, possible_nogoods);
            let pair = value_pairs.take(slot, picked);
            tuples.push(vec![pair / params.values, pair % params.values]);
        }

        relations.push(Relation::NoGoods(TupleSet::new(tuples)));
        constraints.push(Constraint::new(index, vec![first, second]));
    }

    let meta = instance_meta(params, instance)?;
    let domains = vec![Domain::range(params.values)];
    let variables = vec![0; params.variables];
    Ok(Document::new(meta, domains, variables, relations, constraints)?)
}

/// Partial Fisher-Yates shuffle of `0..len` storing only displaced slots.
///
/// Starts as the identity permutation.
#[derive(Debug, Default)]
struct SparseShuffle {
    /// Slots whose value differs from their position.
    displaced: HashMap<usize, usize>,
}

impl SparseShuffle {
    /// Returns the value currently in `slot`.
    fn value(&self, slot: usize) -> usize {
        self.displaced.get(&slot).copied().unwrap_or(slot)
    }

    /// Swaps `slot` with `picked` and returns the value now in `slot`.
    fn take(&mut self, slot: usize, picked: usize) -> usize {
        let current = self.value(slot);
        let chosen = self.value(picked);
        self.displaced.insert(picked, current);
        self.displaced.insert(slot, chosen);
        chosen
    }
}

/// Decodes the `index`-th pair of the row-major list `(0,1), (0,2), .., (n-2,n-1)`.
fn variable_pair(index: usize, variables: usize) -> (usize, usize) {
    let row_start = |first: usize| first * (2 * variables - first - 1) / 2;
    let mut low = 0;
    let mut high = variables - 1;
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if row_start(mid) <= index {
            low = mid;
        } else {
            high = mid;
        }
    }
    (low, low + 1 + index - row_start(low))
}

/// Builds the metadata of instance `instance`.
fn instance_meta(params: &UrbcspParams, instance: usize) -> Result<Meta, GenerateError> {
    let recorded = InstanceParams {
        vars: params.variables,
        vals: params.values,
        constraints: params.constraints,
        nogoods: params.nogoods,
        seed: params.seed,
        instance,
    };
    let text =
        serde_json::to_string(&recorded).map_err(|err| GenerateError::Encode(err.to_string()))?;
    let id = format!(
        "{GENERATOR_ALGO}/{}-{}-{}-{}-{}-{instance}",
        params.variables, params.values, params.constraints, params.nogoods, params.seed
    );
    Ok(Meta::new(id, GENERATOR_ALGO).with_params(text))
}

/// Maps a uniform sample onto `[low, len)` the way the classic tool does.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "Single-precision arithmetic reproduces the reference sequence."
)]
fn pick_index(sample: f32, low: usize, len: usize) -> usize {
    let span = (len - low) as f32;
    let offset = (sample * span) as usize;
    (low + offset).min(len - 1)
}

// ============================================================================
// SECTION: Random Numbers
// ============================================================================

/// First modulus of the combined generator.
const IM1: i32 = 2_147_483_563;
/// Second modulus of the combined generator.
const IM2: i32 = 2_147_483_399;
/// `IM1 - 1`.
const IMM1: i32 = IM1 - 1;
/// First multiplier.
const IA1: i32 = 40_014;
/// Second multiplier.
const IA2: i32 = 40_692;
/// Schrage quotient for `IA1`.
const IQ1: i32 = 53_668;
/// Schrage quotient for `IA2`.
const IQ2: i32 = 52_774;
/// Schrage remainder for `IA1`.
const IR1: i32 = 12_211;
/// Schrage remainder for `IA2`.
const IR2: i32 = 3_791;
/// Shuffle table size.
const NTAB: usize = 32;
/// Shuffle table bucket width.
const NDIV: i32 = 1 + IMM1 / 32;
/// Scale from integer state to `(0, 1)`.
const AM: f64 = 1.0 / 2_147_483_563.0;
/// Largest value returned, keeping the result below 1.
const RNMX: f64 = 1.0 - 1.2e-7;

/// L'Ecuyer generator with Bays-Durham shuffle (Numerical Recipes `ran2`).
#[derive(Debug, Clone)]
struct Ran2 {
    /// Primary state.
    idum: i32,
    /// Secondary state.
    idum2: i32,
    /// Last output before scaling.
    iy: i32,
    /// Shuffle table.
    iv: [i32; NTAB],
}

impl Ran2 {
    /// Seeds a fresh sequence; positive seeds are negated first.
    fn new(seed: i32) -> Self {
        let mut idum = if seed > 0 { -seed } else { seed };
        idum = if idum == i32::MIN || -idum < 1 { 1 } else { -idum };
        let idum2 = idum;
        let mut iv = [0; NTAB];
        for slot in (0 .. NTAB + 8).rev() {
            idum = schrage(idum, IA1, IQ1, IR1, IM1);
            if let Some(entry) = iv.get_mut(slot) {
                *entry = idum;
            }
        }
        Self {
            idum,
            idum2,
            iy: iv[0],
            iv,
        }
    }

    /// Returns the next sample in `(0, 1)` with single precision.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The reference generator rounds each sample to single precision."
    )]
    fn next_f32(&mut self) -> f32 {
        self.idum = schrage(self.idum, IA1, IQ1, IR1, IM1);
        self.idum2 = schrage(self.idum2, IA2, IQ2, IR2, IM2);
        let slot = (self.iy / NDIV) as usize % NTAB;
        self.iy = self.iv[slot] - self.idum2;
        self.iv[slot] = self.idum;
        if self.iy < 1 {
            self.iy += IMM1;
        }
        let sample = (AM * f64::from(self.iy)) as f32;
        if f64::from(sample) > RNMX { RNMX as f32 } else { sample }
    }
}

/// Computes `(a * state) mod m` without overflow (Schrage's method).
const fn schrage(state: i32, a: i32, q: i32, r: i32, m: i32) -> i32 {
    let k = state / q;
    let next = a * (state - k * q) - k * r;
    if next < 0 { next + m } else { next }
}

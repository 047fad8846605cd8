use ark_ff::Field;

use crate::error::ParamsError;
use crate::field::Fq;
use crate::params::PoseidonParams;

/// A Poseidon permutation instance bound to one state width.
///
/// Building one generates its parameter set (see
/// [`PoseidonParams::generate`]); callers that hash many values at the same
/// arity should keep the instance around rather than rebuild it per call.
pub struct Poseidon {
    params: PoseidonParams,
}

impl Poseidon {
    /// Supported state widths. Every call site in this workspace uses one
    /// of these three arities.
    pub const SUPPORTED_ARITIES: [usize; 3] = [2, 5, 16];

    /// Builds the permutation for state width `arity`.
    ///
    /// # Panics
    /// Panics if `arity` is not one of [`Self::SUPPORTED_ARITIES`]. Callers
    /// in this workspace only ever request a fixed, compile-time-known
    /// arity, so this is a programmer error rather than a runtime
    /// condition. Use [`Poseidon::try_for_arity`] at a boundary where the
    /// arity is not already known to be one of the supported three.
    pub fn for_arity(arity: usize) -> Self {
        match Self::try_for_arity(arity) {
            Ok(poseidon) => poseidon,
            Err(err) => panic!("{err}"),
        }
    }

    /// Builds the permutation for state width `arity`, rejecting any
    /// width outside [`Self::SUPPORTED_ARITIES`] instead of panicking.
    pub fn try_for_arity(arity: usize) -> Result<Self, ParamsError> {
        if !Self::SUPPORTED_ARITIES.contains(&arity) {
            return Err(ParamsError::UnsupportedArity(arity));
        }
        Ok(Poseidon {
            params: PoseidonParams::generate(arity),
        })
    }

    /// The digest identifying this instance's generated parameter set.
    pub fn params_digest(&self) -> [u8; 32] {
        self.params.digest
    }

    /// Checks this instance's generated parameter digest against one a
    /// caller has pinned (e.g. compiled into a circuit artifact or a
    /// prior deployment's recorded value), per §4.A's "fail loudly if
    /// artifacts and runtime parameters disagree".
    pub fn verify_params_digest(&self, expected: [u8; 32]) -> Result<(), ParamsError> {
        let actual = self.params_digest();
        if actual != expected {
            return Err(ParamsError::DigestMismatch {
                arity: self.params.t,
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }
        Ok(())
    }

    /// Hashes exactly `arity` field elements to one, via the permutation
    /// followed by a Davies-Meyer feed-forward (`P(state)[0] + state[0]`),
    /// the same construction the source Merkle compression function uses
    /// for its width-2 case, generalized to the other supported arities.
    pub fn hash(&self, inputs: &[Fq]) -> Fq {
        assert_eq!(
            inputs.len(),
            self.params.t,
            "poseidon input length must equal the configured arity"
        );
        let state: Vec<ark_bn254::Fr> = inputs.iter().map(|f| f.inner()).collect();
        let first = state[0];
        let permuted = self.permute(state);
        Fq::from_inner(permuted[0] + first)
    }

    fn permute(&self, mut state: Vec<ark_bn254::Fr>) -> Vec<ark_bn254::Fr> {
        let t = self.params.t;
        let half_full = self.params.full_rounds / 2;
        let mut round = 0usize;

        for _ in 0..half_full {
            self.add_round_constants(&mut state, round);
            full_sbox(&mut state);
            state = self.mix(&state);
            round = round.saturating_add(1);
        }

        for _ in 0..self.params.partial_rounds {
            self.add_round_constants(&mut state, round);
            partial_sbox(&mut state);
            state = self.mix(&state);
            round = round.saturating_add(1);
        }

        for _ in 0..half_full {
            self.add_round_constants(&mut state, round);
            full_sbox(&mut state);
            state = self.mix(&state);
            round = round.saturating_add(1);
        }

        debug_assert_eq!(state.len(), t);
        state
    }

    fn add_round_constants(&self, state: &mut [ark_bn254::Fr], round: usize) {
        let t = self.params.t;
        let base = round.saturating_mul(t);
        for (i, s) in state.iter_mut().enumerate() {
            *s += self.params.round_constants[base.saturating_add(i)];
        }
    }

    fn mix(&self, state: &[ark_bn254::Fr]) -> Vec<ark_bn254::Fr> {
        self.params
            .mds
            .iter()
            .map(|row| {
                row.iter()
                    .zip(state.iter())
                    .fold(ark_bn254::Fr::from(0u64), |acc, (m, s)| acc + *m * *s)
            })
            .collect()
    }
}

fn full_sbox(state: &mut [ark_bn254::Fr]) {
    for s in state.iter_mut() {
        *s = s.pow([5u64]);
    }
}

fn partial_sbox(state: &mut [ark_bn254::Fr]) {
    if let Some(first) = state.first_mut() {
        *first = first.pow([5u64]);
    }
}

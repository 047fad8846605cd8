use ark_ff::{Field, PrimeField};
use sha2::{Digest, Sha256};

/// Bumping this invalidates every previously generated parameter set; a
/// mismatch between a caller's compiled-in digest and the one produced at
/// runtime is treated as a hard failure rather than silently re-derived.
pub const PARAMS_VERSION: u32 = 1;

const FULL_ROUNDS: usize = 8;

/// A generated Poseidon parameter set for one state width.
///
/// Round constants and the MDS matrix are derived deterministically from
/// [`PARAMS_VERSION`] and the state width alone (see [`PoseidonParams::generate`]),
/// so two processes that agree on the version always agree on the
/// parameters without shipping a parameter file.
#[derive(Clone)]
pub struct PoseidonParams {
    pub(crate) t: usize,
    pub(crate) full_rounds: usize,
    pub(crate) partial_rounds: usize,
    pub(crate) round_constants: Vec<ark_bn254::Fr>,
    pub(crate) mds: Vec<Vec<ark_bn254::Fr>>,
    /// SHA-256 digest binding the version, width and generated constants.
    pub digest: [u8; 32],
}

impl PoseidonParams {
    /// Generates the parameter set for state width `t`.
    ///
    /// `t` must be one of the arities this workspace uses (2, 5 or 16);
    /// other widths still generate valid-looking parameters but are not
    /// exercised anywhere and are rejected by [`crate::Poseidon::for_arity`].
    pub fn generate(t: usize) -> Self {
        let partial_rounds = partial_rounds_for(t);
        let total_rounds = FULL_ROUNDS + partial_rounds;
        let seed = seed_for(t);

        let mut round_constants = Vec::with_capacity(total_rounds * t);
        let mut counter: u64 = 0;
        while round_constants.len() < total_rounds * t {
            round_constants.push(expand_field_element(&seed, counter));
            counter = counter.saturating_add(1);
        }

        let mds = cauchy_mds(t);
        let digest = digest_of(t, FULL_ROUNDS, partial_rounds, &round_constants, &mds);

        PoseidonParams {
            t,
            full_rounds: FULL_ROUNDS,
            partial_rounds,
            round_constants,
            mds,
            digest,
        }
    }
}

/// Conservative partial-round counts, one entry per supported arity,
/// matching the ballpark the original Poseidon paper recommends for
/// 128-bit security at each width over a ~254-bit field.
fn partial_rounds_for(t: usize) -> usize {
    match t {
        2 => 56,
        5 => 60,
        16 => 68,
        other => 56usize.saturating_add(other),
    }
}

fn seed_for(t: usize) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"ticket-verify-poseidon");
    hasher.update(PARAMS_VERSION.to_le_bytes());
    hasher.update(u64::try_from(t).unwrap_or(u64::MAX).to_le_bytes());
    hasher.finalize().into()
}

fn expand_field_element(seed: &[u8; 32], counter: u64) -> ark_bn254::Fr {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(b"rc");
    hasher.update(counter.to_le_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    ark_bn254::Fr::from_le_bytes_mod_order(&digest)
}

/// Builds a `t`-by-`t` MDS matrix using the standard Cauchy construction
/// `M[i][j] = 1 / (x_i + y_j)`, with `x_i = i` and `y_j = t + j` chosen so
/// all `x_i + y_j` are distinct and non-zero, guaranteeing the matrix is
/// invertible.
fn cauchy_mds(t: usize) -> Vec<Vec<ark_bn254::Fr>> {
    let xs: Vec<ark_bn254::Fr> =
        (0..t).map(|i| ark_bn254::Fr::from(u64::try_from(i).unwrap_or(u64::MAX))).collect();
    let ys: Vec<ark_bn254::Fr> = (0..t)
        .map(|j| ark_bn254::Fr::from(u64::try_from(t.saturating_add(j)).unwrap_or(u64::MAX)))
        .collect();

    xs.iter()
        .map(|x| {
            ys.iter()
                .map(|y| {
                    let sum = *x + *y;
                    sum.inverse()
                        .expect("cauchy MDS entries are constructed to be non-zero")
                })
                .collect()
        })
        .collect()
}

fn digest_of(
    t: usize,
    full_rounds: usize,
    partial_rounds: usize,
    round_constants: &[ark_bn254::Fr],
    mds: &[Vec<ark_bn254::Fr>],
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(PARAMS_VERSION.to_le_bytes());
    hasher.update(u64::try_from(t).unwrap_or(u64::MAX).to_le_bytes());
    hasher.update(u64::try_from(full_rounds).unwrap_or(u64::MAX).to_le_bytes());
    hasher.update(u64::try_from(partial_rounds).unwrap_or(u64::MAX).to_le_bytes());
    for rc in round_constants {
        hasher.update(rc.into_bigint().to_bytes_le());
    }
    for row in mds {
        for entry in row {
            hasher.update(entry.into_bigint().to_bytes_le());
        }
    }
    hasher.finalize().into()
}

use std::time::{SystemTime, UNIX_EPOCH};

use poseidon::{poseidon16, poseidon2, Fq};
use rand::RngCore;

/// A biometric enrollment commitment.
///
/// Only `commitment` ever leaves the holder's device; `template_hash` and
/// `salt` are never persisted server-side or on-chain.
#[derive(Debug, Clone, Copy)]
pub struct BiometricCommitment {
    /// `Poseidon2(Poseidon16(templateHash), salt)`.
    pub commitment: Fq,
    /// The sixteen-element template hash this commitment was built from.
    pub template_hash: [Fq; 16],
    /// The salt drawn (or supplied) at enrollment.
    pub salt: Fq,
    /// Unix timestamp, seconds, of enrollment. Opaque to the rest of the
    /// system; only used for record-keeping.
    pub enrolled_at: u64,
}

/// Builds a commitment from a template hash, drawing a fresh random salt
/// if `salt` is `None`.
pub fn make_commitment(
    template_hash: [Fq; 16],
    salt: Option<Fq>,
    rng: &mut impl RngCore,
) -> BiometricCommitment {
    let salt = salt.unwrap_or_else(|| Fq::random(rng));
    let commitment = poseidon2(poseidon16(template_hash), salt);
    let enrolled_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    BiometricCommitment {
        commitment,
        template_hash,
        salt,
        enrolled_at,
    }
}

/// Recomputes the commitment for `(template_hash, salt)` and compares it to
/// `expected`.
pub fn verify_commitment(template_hash: [Fq; 16], salt: Fq, expected: Fq) -> bool {
    poseidon2(poseidon16(template_hash), salt).ct_eq(&expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::OsRng;

    fn sample_hash(seed: u64) -> [Fq; 16] {
        let mut out = [Fq::zero(); 16];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Fq::from_u64(seed.saturating_add(i as u64));
        }
        out
    }

    #[test]
    fn commitment_verifies_against_itself() {
        let hash = sample_hash(1);
        let record = make_commitment(hash, Some(Fq::from_u64(77)), &mut OsRng);
        assert!(verify_commitment(record.template_hash, record.salt, record.commitment));
    }

    #[test]
    fn wrong_template_falsifies_commitment() {
        let record = make_commitment(sample_hash(1), Some(Fq::from_u64(77)), &mut OsRng);
        assert!(!verify_commitment(sample_hash(2), record.salt, record.commitment));
    }

    #[test]
    fn wrong_salt_falsifies_commitment() {
        let record = make_commitment(sample_hash(1), Some(Fq::from_u64(77)), &mut OsRng);
        assert!(!verify_commitment(record.template_hash, Fq::from_u64(78), record.commitment));
    }

    #[test]
    fn missing_salt_is_drawn_randomly() {
        let a = make_commitment(sample_hash(1), None, &mut OsRng);
        let b = make_commitment(sample_hash(1), None, &mut OsRng);
        assert_ne!(a.salt, b.salt);
    }

    proptest! {
        /// Property 3: a commitment always verifies against the exact
        /// template/salt pair that produced it, for arbitrary seeds.
        #[test]
        fn commitment_binds_to_its_own_inputs(seed in any::<u64>(), salt in any::<u64>()) {
            let hash = sample_hash(seed);
            let record = make_commitment(hash, Some(Fq::from_u64(salt)), &mut OsRng);
            prop_assert!(verify_commitment(record.template_hash, record.salt, record.commitment));
        }

        /// Substituting a different template hash falsifies the commitment,
        /// for arbitrary distinct seeds.
        #[test]
        fn commitment_rejects_substituted_template(seed in any::<u64>(), other_seed in any::<u64>(), salt in any::<u64>()) {
            prop_assume!(seed != other_seed);
            let record = make_commitment(sample_hash(seed), Some(Fq::from_u64(salt)), &mut OsRng);
            prop_assert!(!verify_commitment(sample_hash(other_seed), record.salt, record.commitment));
        }
    }
}

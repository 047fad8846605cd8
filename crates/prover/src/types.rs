use ark_bn254::Bn254;
use ark_groth16::Proof;
use poseidon::Fq;

/// A Groth16 proof in its native arkworks representation, paired with the
/// seven ordered public signals `(valid, merkleRoot, biometricCommitment,
/// eventId, currentTimestamp, nonce, nonceExpiry)`.
///
/// `valid` (index 0) is a circuit output, not one of the six values
/// [`circuit_io::assemble`](circuit_io::assemble) bound as public inputs;
/// it only exists once the prover has actually run the circuit.
#[derive(Clone)]
pub struct ProofPackage {
    /// The Groth16 proof.
    pub proof: Proof<Bn254>,
    /// The seven public signals, in statement order.
    pub public_signals: [Fq; 7],
}

/// A Groth16 proof formatted for the on-chain verifier ABI:
/// `verifyProof(pA, pB, pC, pubSignals)`.
///
/// Every field element is rendered as its canonical decimal string, the
/// form snarkjs-family Solidity verifiers expect. `p_b`'s two coordinates
/// are swapped within each pair relative to arkworks' native `c0, c1`
/// ordering, to match the Solidity BN254 pairing precompile's layout;
/// this is a contract-boundary quirk, not an algorithmic change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractProof {
    /// G1 point `A`, as `[x, y]`.
    pub p_a: [String; 2],
    /// G2 point `B`, as `[[x.c1, x.c0], [y.c1, y.c0]]`.
    pub p_b: [[String; 2]; 2],
    /// G1 point `C`, as `[x, y]`.
    pub p_c: [String; 2],
    /// The seven public signals, in statement order.
    pub pub_signals: [String; 7],
}

use poseidon::Fq;

/// The six public inputs bound into the statement, in the order the
/// circuit and the on-chain verifier expect them.
///
/// `valid` is not part of this struct: it is a circuit *output*, appended
/// as the first of the seven public signals only after proving.
#[derive(Debug, Clone, Copy)]
pub struct PublicInputs {
    /// The Merkle root the inclusion proof was built against.
    pub merkle_root: Fq,
    /// The holder's enrolled biometric commitment.
    pub biometric_commitment: Fq,
    /// The event this verification is scoped to.
    pub event_id: Fq,
    /// The wallclock timestamp the proof claims to have been built at.
    pub current_timestamp: u64,
    /// A fresh, single-use nonce.
    pub nonce: Fq,
    /// The wallclock instant after which `nonce` may no longer be
    /// accepted.
    pub nonce_expiry: u64,
}

/// The ticket attributes hashed into a leaf, without the salt (which is
/// carried separately as `ticket_salt`).
#[derive(Debug, Clone, Copy)]
pub struct TicketData {
    /// Unique token identifier.
    pub token_id: Fq,
    /// The event this ticket belongs to. Must equal
    /// [`PublicInputs::event_id`]; the assembler enforces this.
    pub event_id: Fq,
    /// Tier, a small integer cast up to a field element.
    pub tier: Fq,
    /// Original sale price, in integer units.
    pub original_price: Fq,
}

/// Everything the holder's device keeps private, assembled for one proving
/// session.
#[derive(Debug, Clone)]
pub struct PrivateInputs {
    /// The ticket attributes (excluding salt).
    pub ticket_data: TicketData,
    /// The ticket leaf's salt.
    pub ticket_salt: Fq,
    /// Sibling hashes from the leaf level up to the root, length `D`.
    pub merkle_path_elements: Vec<Fq>,
    /// Direction bit per level, length `D`. `true` encodes the circuit's
    /// `1` (current node is the right child).
    pub merkle_path_indices: Vec<bool>,
    /// The sixteen-element biometric template hash.
    pub biometric_template: [Fq; 16],
    /// The salt the biometric commitment was built with.
    pub biometric_salt: Fq,
}

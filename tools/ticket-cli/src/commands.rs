use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use biometric::{make_commitment, process_template};
use merkle::{MerkleTree, TicketLeaf, CIRCUIT_DEPTH};
use num_bigint::BigUint;
use poseidon::{Fq, FQ_BYTE_LEN};
use rand::rngs::OsRng;
use rand::RngCore;
use verifier::{Storage, Verifier, VerifierConfig, WireVerificationRequest};

/// Mints a new ticket leaf for `event_id`, appending its hash to the
/// leaf file at `leaves_file` and printing the tree's updated root.
pub fn mint(event_id: u64, token_id: u64, tier: u64, original_price: u64, leaves_file: &Path) -> Result<()> {
    let mut leaves = read_leaves(leaves_file)?;

    let mut salt_bytes = [0u8; FQ_BYTE_LEN];
    OsRng.fill_bytes(&mut salt_bytes);
    // A freshly sampled 32-byte buffer is canonical with overwhelming
    // probability; on the rare non-canonical draw, resample once.
    let salt = Fq::from_be_bytes_canonical(&salt_bytes).unwrap_or_else(|_| Fq::random(&mut OsRng));

    let leaf = TicketLeaf {
        token_id: Fq::from_u64(token_id),
        event_id: Fq::from_u64(event_id),
        tier: Fq::from_u64(tier),
        original_price: Fq::from_u64(original_price),
        salt,
    };
    let leaf_hash = leaf.hash();
    leaves.push(leaf_hash);

    let tree = MerkleTree::build(CIRCUIT_DEPTH, &leaves)
        .map_err(|e| anyhow!("event's tree is full: {e}"))?;
    let index = leaves.len().saturating_sub(1);
    let proof = tree.proof(index).map_err(|e| anyhow!("failed to build inclusion proof: {e}"))?;

    write_leaves(leaves_file, &leaves)?;

    let output = serde_json::json!({
        "index": index,
        "salt": decimal(salt),
        "leafHash": hex::encode(leaf_hash.to_be_bytes()),
        "root": decimal(proof.root),
        "pathElements": proof.path_elements.iter().copied().map(decimal).collect::<Vec<_>>(),
        "pathIndices": proof.path_indices,
    });
    println!("{output}");
    log::info!("minted ticket {token_id} for event {event_id} at index {index}");
    Ok(())
}

/// Enrolls a biometric template, printing the resulting commitment.
pub fn enroll(template: &[f64], salt: Option<u64>) -> Result<()> {
    let template_hash = process_template(template).map_err(|e| anyhow!("invalid template: {e}"))?;
    let record = make_commitment(template_hash, salt.map(Fq::from_u64), &mut OsRng);

    let output = serde_json::json!({
        "commitment": decimal(record.commitment),
        "templateHash": record.template_hash.iter().copied().map(decimal).collect::<Vec<_>>(),
        "salt": decimal(record.salt),
        "enrolledAt": record.enrolled_at,
    });
    println!("{output}");
    Ok(())
}

/// Runs one verification attempt and prints the outcome.
#[allow(clippy::too_many_arguments)]
pub fn verify(
    event_id: String,
    proof_hex: String,
    public_signals: Vec<String>,
    ticket_id: Option<String>,
    vk_file: &Path,
    ledger_file: &Path,
    known_root: Option<String>,
    now: Option<u64>,
) -> Result<()> {
    let public_signals: [String; 7] =
        public_signals.try_into().map_err(|got: Vec<String>| anyhow!("expected 7 public signals, got {}", got.len()))?;

    let wire = WireVerificationRequest { event_id: event_id.clone(), ticket_id, proof_hex, public_signals };
    let request = wire.parse().map_err(|e| anyhow!("request is malformed: {e}"))?;

    let vk_bytes = fs::read(vk_file).with_context(|| format!("reading verifying key from {}", vk_file.display()))?;
    let storage = Storage::open(ledger_file).map_err(|e| anyhow!("opening ledger: {e}"))?;
    let verifier = Verifier::new(VerifierConfig::default(), &vk_bytes, storage)
        .map_err(|e| anyhow!("constructing verifier: {e}"))?;

    if let Some(root) = known_root {
        let event_fq = decimal_to_fq(&event_id).ok_or_else(|| anyhow!("eventId is not a field element"))?;
        let root_fq = decimal_to_fq(&root).ok_or_else(|| anyhow!("known root is not a field element"))?;
        verifier.record_root(event_fq, root_fq);
        log::info!("registered root {root} for event {event_id} for this one-shot check");
    }

    let now = now.unwrap_or_else(unix_now);
    match verifier.verify(&request, now) {
        Ok(receipt) => {
            println!("{}", serde_json::json!({ "accepted": true, "proofHash": hex::encode(receipt.proof_hash) }));
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "accepted": false, "reason": e.to_string() }));
            Ok(())
        }
    }
}

/// Purges nonces whose expiry has already passed.
pub fn purge(ledger_file: &Path, now: Option<u64>, safety_margin_secs: u64) -> Result<()> {
    let storage = Storage::open(ledger_file).map_err(|e| anyhow!("opening ledger: {e}"))?;
    let now = now.unwrap_or_else(unix_now);
    let purged = storage.purge_expired(now, safety_margin_secs).map_err(|e| anyhow!("purging ledger: {e}"))?;
    println!("{}", serde_json::json!({ "purged": purged }));
    log::info!("purged {purged} expired nonces");
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

fn decimal(value: Fq) -> String {
    BigUint::from_bytes_be(&value.to_be_bytes()).to_str_radix(10)
}

fn decimal_to_fq(raw: &str) -> Option<Fq> {
    let value = raw.parse::<BigUint>().ok()?;
    let mut be = value.to_bytes_be();
    if be.len() > FQ_BYTE_LEN {
        return None;
    }
    let mut padded = vec![0u8; FQ_BYTE_LEN.saturating_sub(be.len())];
    padded.append(&mut be);
    let array: [u8; FQ_BYTE_LEN] = padded.try_into().ok()?;
    Fq::from_be_bytes_canonical(&array).ok()
}

fn read_leaves(path: &Path) -> Result<Vec<Fq>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading leaves file {}", path.display()))?;
    let hex_leaves: Vec<String> = serde_json::from_str(&raw).context("leaves file is not a JSON array of strings")?;
    hex_leaves
        .into_iter()
        .map(|h| {
            let bytes = hex::decode(&h).map_err(|e| anyhow!("leaf {h} is not valid hex: {e}"))?;
            let array: [u8; FQ_BYTE_LEN] =
                bytes.try_into().map_err(|_| anyhow!("leaf {h} is not {FQ_BYTE_LEN} bytes"))?;
            Fq::from_be_bytes_canonical(&array).map_err(|e| anyhow!("leaf {h} is not canonical: {e}"))
        })
        .collect()
}

fn write_leaves(path: &Path, leaves: &[Fq]) -> Result<()> {
    let hex_leaves: Vec<String> = leaves.iter().map(|leaf| hex::encode(leaf.to_be_bytes())).collect();
    let raw = serde_json::to_string_pretty(&hex_leaves)?;
    fs::write(path, raw).with_context(|| format!("writing leaves file {}", path.display()))
}

use poseidon::{poseidon_variable, Fq};

use crate::error::BiometricError;

/// Fixed scale factor applied to raw real-valued template entries before
/// rounding to an integer. `10^6` gives six decimal digits of precision.
pub const SCALE_FACTOR: f64 = 1_000_000.0;

/// Number of chunks a raw template is collapsed into.
pub const CHUNKS: usize = 16;

/// Deterministically reduces a captured biometric template (a vector of
/// real-valued measurements) to the sixteen field elements the circuit
/// expects.
///
/// Each entry is scaled by [`SCALE_FACTOR`] and rounded to the nearest
/// integer, the resulting integers are split into sixteen contiguous
/// chunks, and each chunk is collapsed to one field element via
/// [`collapse_chunk`].
pub fn process_template(raw: &[f64]) -> Result<[Fq; CHUNKS], BiometricError> {
    let scaled: Vec<i64> = raw
        .iter()
        .map(|value| {
            let rounded = (value * SCALE_FACTOR).round().clamp(i64::MIN as f64, i64::MAX as f64);
            #[allow(clippy::cast_possible_truncation)]
            {
                rounded as i64
            }
        })
        .collect();

    let chunk_size = scaled.len().div_ceil(CHUNKS).max(1);
    let mut out = [Fq::zero(); CHUNKS];

    for (chunk_index, slot) in out.iter_mut().enumerate() {
        let start = chunk_index.saturating_mul(chunk_size);
        let end = start.saturating_add(chunk_size).min(scaled.len());
        let mut chunk: Vec<i64> = if start < scaled.len() {
            scaled[start..end].to_vec()
        } else {
            Vec::new()
        };
        if chunk.len() < 2 {
            chunk.resize(2, 0);
        }
        let chunk_fq: Vec<Fq> = chunk.into_iter().map(Fq::from_i64).collect();
        *slot = collapse_chunk(&chunk_fq);
    }

    Ok(out)
}

/// Collapses an arbitrarily long chunk of field elements to one, via
/// `Poseidon_k` at groups of at most 16 elements, folded (tree reduction)
/// until a single element remains.
///
/// Chunks at or under the 16-element Poseidon arity ceiling collapse in one
/// call; longer chunks (e.g. from a template whose `ceil(len/16)` chunk
/// size exceeds 16) are reduced in 16-wide groups, repeatedly. Every group
/// handed to [`poseidon_variable`] may be any length from 1 to 16 (a chunk
/// size that isn't itself 2, 5 or 16 is common), which it zero-pads up to
/// the nearest supported arity rather than requiring an exact match.
fn collapse_chunk(values: &[Fq]) -> Fq {
    let mut level = values.to_vec();
    while level.len() > CHUNKS {
        level = level.chunks(CHUNKS).map(poseidon_variable).collect();
    }
    poseidon_variable(&level)
}

/// Cosine similarity between two raw templates, for local liveness/match
/// UX only. Never fed into a ZK statement.
///
/// Fails if the two vectors have different lengths.
pub fn compare_templates(a: &[f64], b: &[f64]) -> Result<f64, BiometricError> {
    if a.len() != b.len() {
        return Err(BiometricError::LengthMismatch { a: a.len(), b: b.len() });
    }
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Recommended accept boundary for [`compare_templates`].
pub const MATCH_THRESHOLD: f64 = 0.7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_template_is_deterministic() {
        let raw = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        assert_eq!(
            process_template(&raw).expect("valid template"),
            process_template(&raw).expect("valid template")
        );
    }

    #[test]
    fn process_template_distinguishes_inputs() {
        let a = process_template(&[0.1; 5]).expect("valid template");
        let b = process_template(&[0.2; 5]).expect("valid template");
        assert_ne!(a, b);
    }

    #[test]
    fn process_template_handles_short_input() {
        let out = process_template(&[1.0]).expect("valid template");
        assert_eq!(out.len(), CHUNKS);
    }

    #[test]
    fn compare_templates_identical_is_one() {
        let t = vec![1.0, 2.0, 3.0];
        let sim = compare_templates(&t, &t).expect("equal-length templates");
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn compare_templates_rejects_length_mismatch() {
        assert!(compare_templates(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn process_template_handles_long_input() {
        // A realistic face-embedding-sized template (512 entries) pushes
        // the naive ceil(len/16) chunk size past the 16-element Poseidon
        // arity ceiling; this must still collapse deterministically.
        let raw: Vec<f64> = (0..512).map(|i| f64::from(i) / 1000.0).collect();
        let out = process_template(&raw).expect("valid template");
        assert_eq!(out.len(), CHUNKS);
        let again = process_template(&raw).expect("valid template");
        assert_eq!(out, again);
    }

    #[test]
    fn process_template_handles_chunk_sizes_outside_supported_arities() {
        // chunk_size = ceil(len/16) lands on 3, 4, 6 and 8 here, none of
        // which is a supported Poseidon arity; collapsing must not panic.
        for len in [33, 49, 81, 128] {
            let raw: Vec<f64> = (0..len).map(|i| f64::from(i) / 10.0).collect();
            let out = process_template(&raw).expect("valid template");
            assert_eq!(out.len(), CHUNKS);
        }
    }
}

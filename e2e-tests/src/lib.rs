//! End-to-end tests for ticket verification
//!
//! This crate bridges the gap between:
//! - `merkle`/`biometric`/`circuit-io`, which assemble a ticket-validity
//!   statement
//! - `verifier`, which runs the nine-gate acceptance pipeline against it
//!
//! There are no compiled circom artifacts in this workspace, so these
//! tests drive a real Groth16 setup/prove/verify cycle against a small
//! stand-in circuit (see `tests::utils::ToyTicketCircuit`) rather than
//! going through `prover`. The verifier only ever sees a proof and seven
//! public signals; it cannot tell which circuit produced them.

#[cfg(test)]
mod tests;

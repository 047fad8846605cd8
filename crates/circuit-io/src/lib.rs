//! Packages public/private proving inputs into the exact, ordered layout
//! the circuit and prover backend expect, and rejects semantically
//! inconsistent requests before the expensive prover is ever invoked.

#![forbid(unsafe_code)]

mod assemble;
mod error;
mod inputs;

pub use assemble::{assemble, AssembledInputs, InputValue};
pub use error::AssemblerError;
pub use inputs::{PrivateInputs, PublicInputs, TicketData};

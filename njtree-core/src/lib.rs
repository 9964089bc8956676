#[macro_use]
mod par;

pub mod batch;
pub mod error;
pub mod io;
pub mod phylo;

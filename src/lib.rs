//! pKa-corr: pKa Agreement Statistics Library
//!
//! Scores predicted pKa values (or pKa shifts) against experiment:
//! residual z-score outlier removal, RMSD, error-weighted correlation,
//! and per-residue-category breakdowns.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;

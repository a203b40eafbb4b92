//! Durable parameter state shared with REAPER
//!
//! The store maps `(effect, param)` pairs to `f64` values, persisted in
//! REAPER's `reaper-extstate.ini`. REAPER polls the same file from a JSFX
//! or ReaScript, so the file is the actual bridge boundary: the process on
//! either side only ever sees what has been written durably.
//!
//! # Consistency
//!
//! ```text
//!    UI clients ──set──► StateStore ──rewrite──► reaper-extstate.ini
//!                            │                        ▲
//!                          cache                      │ polls
//!                            └──get (read-through)  REAPER
//! ```
//!
//! Every write re-reads the file and merges, so concurrent REAPER edits to
//! *other* fields survive. Writes racing on the same field are
//! last-writer-wins by design.

mod paths;
mod state;

pub use state::StateStore;

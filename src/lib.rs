//! Artifact Bootstrap - self-updating loader for a versioned companion artifact
//!
//! Before the host can use the companion artifact, the bootstrap makes sure a
//! verified copy is installed locally: it checks a remote manifest, downloads
//! and verifies a newer build when there is one, atomically swaps it in, and
//! finally registers the artifact with the host and resolves its entry point.

pub mod engine;

// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that name the concepts of the system:
// observation records, the feature tuple, the error taxonomy
// and the seams to outside collaborators.
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO regression math
//   - Only plain Rust structs, enums, and traits

// Observation records, typed observations and feature tuples
pub mod observation;

// Error taxonomy and status codes shared by every layer
pub mod errors;

// Seams to outside collaborators (the raw data fetcher)
pub mod traits;

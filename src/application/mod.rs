// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers to train a model or answer a
// prediction request.
//
// Rules for this layer:
//   - No regression math here (that's Layer 5)
//   - No printing or argument parsing (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination

// Where data comes from and where the model goes
pub mod config;

// The fetch → load → fit → persist pipeline
pub mod train_use_case;

// Request facade shared by every entry point
pub mod service;

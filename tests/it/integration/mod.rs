//! Multi-component workflow tests covering full pointer gestures.

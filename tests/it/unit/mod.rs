//! Unit tests for the drag-and-drop engine.

mod events_tests;

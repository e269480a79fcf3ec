//! End-to-end tests for the chatbot studio live under `tests/`.

//! Workspace root package for tooling (pre-commit hooks).

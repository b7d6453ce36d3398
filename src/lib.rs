// Reusable library API, shared by the CLI and integration tests
pub mod dice;
pub mod dictionary;
pub mod errors;
pub mod grid;
pub mod layout;
pub mod letters;
pub mod logging;
pub mod placement;
pub mod solver;

// Adapters layer: concrete implementations for external systems.

pub mod groupme;

pub use groupme::GroupMeClient;

// Sampler module - note sound stores and the decoded sound bank

pub mod bank;
pub mod loader;

pub use bank::{LoadReport, SoundBank};
pub use loader::{DirectorySoundStore, MemorySoundStore, SampleError, SoundStore};

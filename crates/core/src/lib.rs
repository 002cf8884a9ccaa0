pub mod data;
pub mod engine;
pub mod error;
pub mod genetics;
pub mod types;

pub use data::{DogStore, MemoryDogStore};
pub use engine::{GenealogyEngine, GenealogyEngineBuilder};
pub use error::{GenealogyError, Result};
pub use types::{DogId, DogRecord, Sex};

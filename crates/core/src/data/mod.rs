// Dog records and the store boundary the genealogy engine reads through.

pub mod io;
pub mod store;

pub use store::{DogStore, MemoryDogStore};

pub mod creations;

// Rusted Steps: input mapping for a rhythm game engine

pub mod engine;

// Engine modules: input mapping

pub mod input;

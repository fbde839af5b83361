// Library entry exposing assembler modules.
pub mod assembler;
pub mod core;

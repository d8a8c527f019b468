pub mod classify;
pub mod cli;
pub mod crypto;
pub mod emit;
pub mod minify;
pub mod obfuscate;
pub mod profile;
pub mod tok;

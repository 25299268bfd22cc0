pub mod discovery;
pub mod document;
pub mod generator;
pub mod translator;

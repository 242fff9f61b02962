pub mod eval;
pub mod tensor;

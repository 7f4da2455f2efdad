pub mod args;
pub mod evaluate;

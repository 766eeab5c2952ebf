pub mod calculators;
pub mod engine;
pub mod state;

#[cfg(test)]
mod tests;

pub mod health;
pub mod router;
pub mod testing;

#[cfg(test)]
mod tests;

pub mod modules;

pub use modules::uploads;

#[cfg(test)]
mod tests;

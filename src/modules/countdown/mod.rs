pub mod clock;
pub mod progress_sample;
pub mod state_machine;
pub mod tick_driver;

#[cfg(test)]
pub mod testing;

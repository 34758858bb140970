pub mod analysis;
pub mod decode;
pub mod features;
pub mod segment;
pub mod waveform;

#[cfg(test)]
pub(crate) mod fixtures;

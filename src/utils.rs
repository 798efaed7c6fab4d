pub const APP_NAME: &str = "tower-timer";

pub const MAX_MINUTES: u32 = 99;
pub const MAX_SECONDS: u32 = 59;

/// Parse a duration text field. Empty or non-numeric text counts as zero.
pub fn parse_field(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// Append a typed digit to a two-digit field, keeping the last digit already there.
///
/// Typing `4` into `"5"` gives `54`; typing into a full field shifts the old
/// units digit up. The result is clamped to `max`.
pub fn push_digit(current: u32, digit: u32, max: u32) -> u32 {
    ((current % 10) * 10 + digit).min(max)
}

/// Step a field up or down by one, staying inside `0..=max`
pub fn step_field(current: u32, up: bool, max: u32) -> u32 {
    if up {
        (current + 1).min(max)
    } else {
        current.saturating_sub(1)
    }
}

/// Convert user volume percentage (0-100) to amplitude multiplier using perceptual scaling
///
/// Human hearing is logarithmic, so we use x^4 to approximate an exponential curve.
/// The difference between 1-2% will feel the same as the difference between 99-100%.
///
/// # Arguments
/// * `percent` - User input volume percentage (0-100)
///
/// # Returns
/// * `f32` - Amplitude multiplier (0.0-1.0)
pub fn volume_percent_to_amplitude(percent: u8) -> f32 {
    let x = (percent.min(100) as f32) / 100.0;
    x.powi(4)
}

/// Convert amplitude multiplier (0.0-1.0) back to user volume percentage (0-100)
/// This is the inverse of volume_percent_to_amplitude().
pub fn amplitude_to_volume(amplitude: f32) -> u8 {
    let x = amplitude.clamp(0.0, 1.0).powf(0.25);
    (x * 100.0).round() as u8
}

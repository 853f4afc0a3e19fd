//! Header names of the MCS Multiwell export tables.

pub const CHANNEL_LABEL: &str = "Channel Label";
pub const WELL_LABEL: &str = "Well Label";
pub const START_TIMESTAMP: &str = "Start timestamp [µs]";
pub const DURATION: &str = "Duration [µs]";
pub const SPIKE_COUNT: &str = "Spike Count";
pub const SPIKE_FREQUENCY: &str = "Spike Frequency [Hz]";

/// Plate metadata carried by every export; required on input, never read.
pub const DROPPED: [&str; 5] = [
    "Compound ID",
    "Compound Name",
    "Experiment",
    "Dose Label",
    "Dose [pM]",
];

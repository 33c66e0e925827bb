use crate::models::{KillZone, Trend};
use chrono::{DateTime, Timelike, Utc};

/// (name, start hour, end hour) in UTC, end exclusive
const SESSIONS: [(&str, u32, u32); 3] = [
    ("London Kill Zone", 2, 5),
    ("New York Kill Zone", 12, 15),
    ("Asian Kill Zone", 0, 3),
];

/// All kill zones with their active flag at `now`, tagged with the current trend
pub fn kill_zones(now: DateTime<Utc>, trend: Trend) -> Vec<KillZone> {
    let hour = now.hour();
    SESSIONS
        .iter()
        .map(|&(name, start_hour, end_hour)| KillZone {
            name: name.to_string(),
            start_hour,
            end_hour,
            active: hour >= start_hour && hour < end_hour,
            bias: trend,
        })
        .collect()
}

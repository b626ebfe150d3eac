// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use static_assertions::const_assert;
use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, Mul},
    str::FromStr,
};

/// A time of day, in seconds since the start of the service day.
///
/// Trips running past midnight carry values greater than `24:00:00`,
/// and a reverse search may hand out values below zero.
pub type Time = i32;

/// Largest time of day accepted in schedules and requests (seven service days).
pub const MAX_TIME_OF_DAY: Time = 7 * 24 * 60 * 60;

/// Sentinel for a stop not reached by a forward search.
pub const UNREACHED_FORWARD: Time = i32::MAX;

/// Sentinel for a stop not reached by a reverse search.
pub const UNREACHED_REVERSE: Time = i32::MIN;

// Times plus any legal duration must never collide with the sentinels.
const_assert!(2 * (MAX_TIME_OF_DAY as i64) < (i32::MAX as i64));

pub const SECONDS_IN_HOUR: u32 = 60 * 60;
pub const SECONDS_IN_MINUTE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PositiveDuration {
    pub(crate) seconds: u32,
}

impl PositiveDuration {
    pub const fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            seconds: hours * SECONDS_IN_HOUR + minutes * SECONDS_IN_MINUTE + seconds,
        }
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        self.seconds as u64
    }

    /// Duration in seconds, as used by the search arithmetic.
    pub fn as_secs(&self) -> i32 {
        self.seconds as i32
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }

    fn to_hms(self) -> (u32, u32, u32) {
        let hours = self.seconds / SECONDS_IN_HOUR;
        let minutes = (self.seconds % SECONDS_IN_HOUR) / SECONDS_IN_MINUTE;
        let seconds = self.seconds % SECONDS_IN_MINUTE;
        (hours, minutes, seconds)
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let (hours, minutes, seconds) = self.to_hms();
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds + rhs.seconds,
        }
    }
}

impl Mul<u32> for PositiveDuration {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self {
            seconds: self.seconds * rhs,
        }
    }
}

impl FromStr for PositiveDuration {
    type Err = ParseTimeError;

    /// Parses `HH:MM:SS`. Hours may exceed 24.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seconds = parse_hms(s)?;
        Ok(Self { seconds })
    }
}

impl Serialize for PositiveDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PositiveDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        PositiveDuration::from_str(&string).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeError {
    input: String,
}

impl Display for ParseTimeError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "unable to parse `{}` as a time, expected HH:MM or HH:MM:SS",
            self.input
        )
    }
}

impl std::error::Error for ParseTimeError {}

fn parse_hms(s: &str) -> Result<u32, ParseTimeError> {
    let error = || ParseTimeError {
        input: s.to_string(),
    };
    let mut parts = s.trim().split(':');
    let mut next_number = |required: bool| -> Result<Option<u32>, ParseTimeError> {
        match parts.next() {
            Some(part) if !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) => {
                part.parse::<u32>().map(Some).map_err(|_| error())
            }
            None if !required => Ok(None),
            _ => Err(error()),
        }
    };
    let hours = next_number(true)?.ok_or_else(error)?;
    let minutes = next_number(true)?.ok_or_else(error)?;
    let seconds = next_number(false)?.unwrap_or(0);
    if next_number(false)?.is_some() || minutes >= 60 || seconds >= 60 {
        return Err(error());
    }
    let total = hours
        .checked_mul(SECONDS_IN_HOUR)
        .and_then(|h| h.checked_add(minutes * SECONDS_IN_MINUTE + seconds))
        .ok_or_else(error)?;
    Ok(total)
}

/// Parses a time of day written `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<Time, ParseTimeError> {
    let seconds = parse_hms(s)?;
    if seconds > MAX_TIME_OF_DAY as u32 {
        return Err(ParseTimeError {
            input: s.to_string(),
        });
    }
    Ok(seconds as Time)
}

/// `HH:MM` when the seconds are zero, `HH:MM:SS` otherwise.
/// Sentinel values print as `-`.
pub fn format_time(time: Time) -> String {
    if time == UNREACHED_FORWARD || time == UNREACHED_REVERSE {
        return "-".to_string();
    }
    let sign = if time < 0 { "-" } else { "" };
    let abs = time.unsigned_abs();
    let (hours, minutes, seconds) = PositiveDuration::from_seconds(abs).to_hms();
    if seconds == 0 {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

/// Compact rendering of a duration in seconds, e.g. `1h02m`, `3m45s`, `45s`.
pub fn format_duration(seconds: i32) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let (hours, minutes, secs) = PositiveDuration::from_seconds(seconds.unsigned_abs()).to_hms();
    let body = match (hours, minutes, secs) {
        (0, 0, s) => format!("{}s", s),
        (0, m, 0) => format!("{}m", m),
        (0, m, s) => format!("{}m{:02}s", m, s),
        (h, m, 0) => format!("{}h{:02}m", h, m),
        (h, m, s) => format!("{}h{:02}m{:02}s", h, m, s),
    };
    format!("{}{}", sign, body)
}

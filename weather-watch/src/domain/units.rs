//! Unit conversions applied when parsing observations.

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// Metres-per-second to miles-per-hour factor.
const MPS_TO_MPH: f64 = 2.237;

/// Kilometres per mile.
const KM_PER_MILE: f64 = 1.609344;

/// The 16 compass points, clockwise from north.
const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / KM_PER_MILE
}

/// Map a bearing in degrees to a 16-point compass direction.
///
/// Sectors are 22.5° wide and start at north, so 0–22.4° is "N" and
/// 22.5–44.9° is "NNE". Negative and >360 bearings wrap.
///
/// ```
/// use weather_watch::domain::units::degrees_to_cardinal;
///
/// assert_eq!(degrees_to_cardinal(0.0), "N");
/// assert_eq!(degrees_to_cardinal(90.0), "E");
/// assert_eq!(degrees_to_cardinal(-90.0), "W");
/// ```
pub fn degrees_to_cardinal(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let index = (normalized / 22.5).floor() as usize;
    CARDINALS[index % CARDINALS.len()]
}

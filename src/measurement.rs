use std::fmt;
use std::str;

use crate::proto::{ProtoError, Result};

/// Length of the display readout payload carried by a measurement frame.
pub const PAYLOAD_LEN: usize = 14;

/// Measurement function reported in the first payload byte.
///
/// The wire table has 31 slots; a few functions appear under more than one
/// index (the rotary switch reaches them along different paths), so several
/// indices collapse onto the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Mode {
    V_AC,
    MV_AC,
    V_DC,
    MV_DC,
    HERTZ,
    DUTY_CYCLE,
    OHMS,
    CONTINUITY,
    DIODE_TEST,
    CAPACITANCE,
    CELSIUS,
    FAHRENHEIT,
    UA_DC,
    UA_AC,
    MA_DC,
    MA_AC,
    A_DC,
    A_AC,
    HFE,
    LIVE,
    NCV,
    V_AC_LOZ,
    LOW_PASS,
    V_AC_OVER_DC,
    AC_PLUS_DC,
    AC_PLUS_DC2,
    INRUSH,
}

impl Mode {
    pub(crate) fn from_index(idx: u8) -> Option<Self> {
        Some(match idx {
            0 => Self::V_AC,
            1 => Self::MV_AC,
            2 => Self::V_DC,
            3 => Self::MV_DC,
            4 => Self::HERTZ,
            5 => Self::DUTY_CYCLE,
            6 => Self::OHMS,
            7 => Self::CONTINUITY,
            8 => Self::DIODE_TEST,
            9 => Self::CAPACITANCE,
            10 => Self::CELSIUS,
            11 => Self::FAHRENHEIT,
            12 => Self::UA_DC,
            13 => Self::UA_AC,
            14 => Self::MA_DC,
            15 => Self::MA_AC,
            16 | 23 => Self::A_DC,
            17 | 22 => Self::A_AC,
            18 => Self::HFE,
            19 => Self::LIVE,
            20 => Self::NCV,
            21 => Self::V_AC_LOZ,
            24 | 26 | 28 => Self::LOW_PASS,
            25 => Self::V_AC_OVER_DC,
            27 => Self::AC_PLUS_DC,
            29 => Self::AC_PLUS_DC2,
            30 => Self::INRUSH,
            _ => return None,
        })
    }

    /// Unit printed on the LCD for a range code. `None` for (mode, range)
    /// pairs the meter is not known to produce.
    pub fn display_unit(self, range: char) -> Option<&'static str> {
        Some(match (self, range) {
            (
                Mode::V_AC | Mode::V_DC | Mode::V_AC_LOZ | Mode::LOW_PASS | Mode::V_AC_OVER_DC,
                '0'..='3',
            ) => "V",
            (Mode::MV_AC | Mode::MV_DC, '0') => "mV",
            (Mode::HERTZ, '0' | '1') => "Hz",
            (Mode::HERTZ, '2'..='4') => "kHz",
            (Mode::HERTZ, '5'..='7') => "MHz",
            (Mode::DUTY_CYCLE, '0') => "%",
            (Mode::OHMS, '0') => "Ω",
            (Mode::OHMS, '1'..='3') => "kΩ",
            (Mode::OHMS, '4'..='6') => "MΩ",
            (Mode::CONTINUITY, '0') => "Ω",
            (Mode::DIODE_TEST, '0') => "V",
            (Mode::CAPACITANCE, '0' | '1') => "nF",
            (Mode::CAPACITANCE, '2'..='4') => "uF",
            (Mode::CAPACITANCE, '5'..='7') => "mF",
            (Mode::CELSIUS, '0' | '1') => "°C",
            (Mode::FAHRENHEIT, '0' | '1') => "°F",
            (Mode::UA_DC | Mode::UA_AC, '0' | '1') => "uA",
            (Mode::MA_DC | Mode::MA_AC, '0' | '1') => "mA",
            (Mode::A_DC | Mode::A_AC | Mode::AC_PLUS_DC | Mode::AC_PLUS_DC2, '1') => "A",
            (Mode::HFE, '0') => "B",
            (Mode::NCV, '0') => "NCV",
            _ => return None,
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::V_AC => f.write_str("ACV"),
            Mode::MV_AC => f.write_str("ACmV"),
            Mode::V_DC => f.write_str("DCV"),
            Mode::MV_DC => f.write_str("DCmV"),
            Mode::HERTZ => f.write_str("Hz"),
            Mode::DUTY_CYCLE => f.write_str("%"),
            Mode::OHMS => f.write_str("OHM"),
            Mode::CONTINUITY => f.write_str("CONT"),
            Mode::DIODE_TEST => f.write_str("Diode"),
            Mode::CAPACITANCE => f.write_str("CAP"),
            Mode::CELSIUS => f.write_str("°C"),
            Mode::FAHRENHEIT => f.write_str("°F"),
            Mode::UA_DC => f.write_str("DCuA"),
            Mode::UA_AC => f.write_str("ACuA"),
            Mode::MA_DC => f.write_str("DCmA"),
            Mode::MA_AC => f.write_str("ACmA"),
            Mode::A_DC => f.write_str("DCA"),
            Mode::A_AC => f.write_str("ACA"),
            Mode::HFE => f.write_str("hFE"),
            Mode::LIVE => f.write_str("Live"),
            Mode::NCV => f.write_str("NCV"),
            Mode::V_AC_LOZ => f.write_str("LozV"),
            Mode::LOW_PASS => f.write_str("LPF"),
            Mode::V_AC_OVER_DC => f.write_str("AC/DC"),
            Mode::AC_PLUS_DC => f.write_str("AC+DC"),
            Mode::AC_PLUS_DC2 => f.write_str("AC+DC2"),
            Mode::INRUSH => f.write_str("INRUSH"),
        }
    }
}

/// What the digit area of the LCD shows.
///
/// Overload and the NCV bar display never carry a usable number, so they are
/// their own variants instead of flags beside a meaningless value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue {
    /// The reading exceeds the selected range (`OL` and its variants).
    Overload,
    /// Non-contact voltage detection level 0..=5 (`EF`, `-` .. `-----`).
    Ncv(u8),
    /// A numeric reading.
    Value(f64),
}

impl DisplayValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DisplayValue::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Display texts the vendor app treats as overload.
const OVERLOAD: [&str; 8] = [".OL", "O.L", "OL.", "OL", "-.OL", "-O.L", "-OL.", "-OL"];

fn ncv_level(display: &str) -> Option<u8> {
    match display {
        "EF" => Some(0),
        "-" => Some(1),
        "--" => Some(2),
        "---" => Some(3),
        "----" => Some(4),
        "-----" => Some(5),
        _ => None,
    }
}

fn classify(display: &str) -> Result<DisplayValue> {
    if OVERLOAD.contains(&display) {
        return Ok(DisplayValue::Overload);
    }
    if let Some(level) = ncv_level(display) {
        return Ok(DisplayValue::Ncv(level));
    }
    display
        .parse::<f64>()
        .map(DisplayValue::Value)
        .map_err(|_| ProtoError::DisplayParse(display.to_string()))
}

/// Power of ten folded into the value when the unit starts with an
/// exponent prefix.
fn leading_exponent(unit: &str) -> Option<i32> {
    match unit.chars().next()? {
        'M' => Some(6),
        'k' => Some(3),
        'm' => Some(-3),
        'u' => Some(-6),
        'n' => Some(-9),
        _ => None,
    }
}

/// One decoded display readout.
///
/// Carries the reading both exactly as shown on the LCD (`display_value` /
/// `display_unit`, e.g. 200 mV) and folded to the base unit (`value` /
/// `unit`, e.g. 0.2 V).
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Original payload bytes as received.
    pub raw: [u8; PAYLOAD_LEN],
    pub mode: Mode,
    /// Range code, internal to the device.
    pub range: char,
    /// Display text with blanks removed.
    pub display: String,
    /// The reading exactly as shown on the LCD.
    pub display_value: DisplayValue,
    /// Unit printed on the LCD, e.g. `mV`.
    pub display_unit: &'static str,
    /// The reading folded to the base unit.
    pub value: DisplayValue,
    /// Base unit with the exponent prefix stripped.
    pub unit: &'static str,
    /// `byte9 * 10 + byte10`; meaning not clear.
    pub progress: u16,
    /// Min/max recording shows the maximum.
    pub is_max: bool,
    /// Min/max recording shows the minimum.
    pub is_min: bool,
    /// Display hold active.
    pub is_hold: bool,
    /// Relative (delta) mode active.
    pub is_rel: bool,
    /// Auto ranging active.
    pub is_auto: bool,
    /// Battery low.
    pub battery_warning: bool,
    /// Input above roughly 30 V.
    pub hv_warning: bool,
    /// Displayed value is DC.
    pub is_dc: bool,
    /// Peak recording shows the maximum peak.
    pub is_peak_max: bool,
    /// Peak recording shows the minimum peak.
    pub is_peak_min: bool,
    /// Bit 0 of the last flag byte; meaning not clear.
    pub bar_polarity: bool,
}

impl TryFrom<&[u8]> for Measurement {
    type Error = ProtoError;

    fn try_from(payload: &[u8]) -> Result<Self> {
        let raw: [u8; PAYLOAD_LEN] = payload
            .try_into()
            .map_err(|_| ProtoError::PayloadLength(payload.len()))?;

        let mode = Mode::from_index(raw[0]).ok_or(ProtoError::UnknownMode(raw[0]))?;
        let range = raw[1] as char;
        let display: String = str::from_utf8(&raw[2..9])?
            .chars()
            .filter(|c| *c != ' ')
            .collect();

        let display_value = classify(&display)?;
        let display_unit = mode
            .display_unit(range)
            .ok_or(ProtoError::UnknownRange { mode, range })?;

        // Fold the exponent prefix into the number. Overload and NCV
        // readings keep the unit exactly as displayed.
        let (value, unit) = match (display_value, leading_exponent(display_unit)) {
            (DisplayValue::Value(v), Some(exp)) => (
                DisplayValue::Value(v * 10f64.powi(exp)),
                &display_unit[1..],
            ),
            (other, _) => (other, display_unit),
        };

        Ok(Self {
            raw,
            mode,
            range,
            display,
            display_value,
            display_unit,
            value,
            unit,
            progress: u16::from(raw[9]) * 10 + u16::from(raw[10]),
            is_max: raw[11] & 8 != 0,
            is_min: raw[11] & 4 != 0,
            is_hold: raw[11] & 2 != 0,
            is_rel: raw[11] & 1 != 0,
            // Inverted on the wire: flag clear means auto ranging.
            is_auto: raw[12] & 4 == 0,
            battery_warning: raw[12] & 2 != 0,
            hv_warning: raw[12] & 1 != 0,
            is_dc: raw[13] & 8 != 0,
            is_peak_max: raw[13] & 4 != 0,
            is_peak_min: raw[13] & 2 != 0,
            bar_polarity: raw[13] & 1 != 0,
        })
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_value {
            DisplayValue::Overload => write!(f, "OL {}", self.display_unit),
            DisplayValue::Ncv(level) => write!(f, "NCV level {}", level),
            DisplayValue::Value(_) => write!(f, "{} {}", self.display, self.display_unit),
        }
    }
}

//! Specialist matching, slot, and booking types.
//!
//! Wire shapes for `/get_specialists`, `/get_all_doctors`, and `/get_slots`,
//! plus the locally confirmed [`BookingRequest`].

pub use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::ClientError;

/// Status string the server uses for a successful reply.
pub const STATUS_SUCCESS: &str = "success";

/// A scalar the server may send either as a string or a number.
///
/// Rooms and fees come straight out of the clinic database, so `"204"` and
/// `204` are both seen in practice. Displayed verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum DisplayValue {
    Text(String),
    Number(serde_json::Number),
    #[default]
    Empty,
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Text(s) => write!(f, "{s}"),
            DisplayValue::Number(n) => write!(f, "{n}"),
            DisplayValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for DisplayValue {
    fn from(s: &str) -> Self {
        DisplayValue::Text(s.to_string())
    }
}

impl From<i64> for DisplayValue {
    fn from(n: i64) -> Self {
        DisplayValue::Number(n.into())
    }
}

/// A doctor matched (or listed) by the server.
///
/// Immutable; scoped to the result set it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    /// Shift text, e.g. `"09:00 AM - 01:00 PM"`.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub room: DisplayValue,
    #[serde(default)]
    pub fee: DisplayValue,
}

/// Body of `POST /get_specialists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistsRequest {
    pub symptoms: String,
}

/// Body returned by `POST /get_specialists` and `GET /get_all_doctors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistsReply {
    pub status: String,
    #[serde(default)]
    pub doctors: Option<Vec<Specialist>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SpecialistsReply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Reject a "success" reply that carries no doctor list.
    pub fn check_shape(&self) -> Result<(), ClientError> {
        if self.is_success() && self.doctors.is_none() {
            return Err(ClientError::Decode(
                "success reply is missing `doctors`".to_string(),
            ));
        }
        Ok(())
    }

    /// The matched doctors, empty for non-success replies.
    pub fn doctors(&self) -> &[Specialist] {
        match (&self.doctors, self.is_success()) {
            (Some(doctors), true) => doctors,
            _ => &[],
        }
    }
}

/// One bookable time for a specialist.
///
/// Accepts both wire shapes the server has used: a bare string
/// (`"10:00 AM"`) and an object (`{"time": "10:00 AM", "is_booked": false}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SlotWire")]
pub struct Slot {
    pub time: String,
    pub is_booked: bool,
}

impl Slot {
    pub fn open(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            is_booked: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlotWire {
    Label(String),
    Detailed {
        time: String,
        #[serde(default)]
        is_booked: bool,
    },
}

impl From<SlotWire> for Slot {
    fn from(wire: SlotWire) -> Self {
        match wire {
            SlotWire::Label(time) => Slot::open(time),
            SlotWire::Detailed { time, is_booked } => Slot { time, is_booked },
        }
    }
}

/// Body of `POST /get_slots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsRequest {
    pub doc_id: i64,
    /// Day to check bookings against; the server treats a missing date as
    /// "no bookings known".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Body returned by `POST /get_slots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsReply {
    pub status: String,
    #[serde(default)]
    pub slots: Option<Vec<Slot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SlotsReply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Reject a "success" reply that carries no slot list.
    pub fn check_shape(&self) -> Result<(), ClientError> {
        if self.is_success() && self.slots.is_none() {
            return Err(ClientError::Decode(
                "success reply is missing `slots`".to_string(),
            ));
        }
        Ok(())
    }
}

/// A (doctor, time) pair the user is asked to confirm.
///
/// Never sent anywhere: confirmation is a local acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_name: String,
    pub slot_time: String,
}

impl BookingRequest {
    pub fn new(doctor_name: impl Into<String>, slot_time: impl Into<String>) -> Self {
        Self {
            doctor_name: doctor_name.into(),
            slot_time: slot_time.into(),
        }
    }
}

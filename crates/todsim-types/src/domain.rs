//! Domain catalog shown on the start page and used to greet the user.

use serde::{Deserialize, Serialize};

/// Task domains the simulator offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Hotel,
    Restaurant,
    Flight,
}

impl Domain {
    pub fn all() -> [Domain; 3] {
        [Domain::Hotel, Domain::Restaurant, Domain::Flight]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hotel" => Some(Domain::Hotel),
            "restaurant" => Some(Domain::Restaurant),
            "flight" => Some(Domain::Flight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Hotel => "hotel",
            Domain::Restaurant => "restaurant",
            Domain::Flight => "flight",
        }
    }

    pub fn info(&self) -> &'static DomainInfo {
        match self {
            Domain::Hotel => &HOTEL,
            Domain::Restaurant => &RESTAURANT,
            Domain::Flight => &FLIGHT,
        }
    }
}

/// Greeting for a domain name, with a generic fallback for unknown names
pub fn greeting_for(domain: &str) -> String {
    match Domain::parse(domain) {
        Some(d) => d.info().greeting.to_string(),
        None => format!("Hello! I'm your {} assistant. How can I help you today?", domain),
    }
}

/// Static description of one domain
#[derive(Debug)]
pub struct DomainInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub greeting: &'static str,
    /// Intent name and what it means
    pub intents: &'static [(&'static str, &'static str)],
    /// Slot name and the intents that need it
    pub slots: &'static [(&'static str, &'static [&'static str])],
    /// Action name and the slots it consumes
    pub actions: &'static [(&'static str, &'static [&'static str])],
}

impl DomainInfo {
    pub fn intent_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.intents.iter().map(|(name, _)| *name)
    }

    /// Check cross references between actions, slots and intents
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Domain name must be a non-empty string".to_string());
        }
        if self.description.is_empty() {
            errors.push("Domain description must be a non-empty string".to_string());
        }
        if self.intents.is_empty() {
            errors.push("Intent list must be a non-empty dictionary".to_string());
        }

        for (action, slots) in self.actions {
            for slot in slots.iter() {
                if !self.slots.iter().any(|(name, _)| name == slot) {
                    errors.push(format!(
                        "Slot '{}' in action '{}' not found in slots_to_fill",
                        slot, action
                    ));
                }
            }
        }

        for (slot, intents) in self.slots {
            for intent in intents.iter() {
                if !self.intents.iter().any(|(name, _)| name == intent) {
                    errors.push(format!(
                        "Intent '{}' for slot '{}' not found in intent_list",
                        intent, slot
                    ));
                }
            }
        }

        errors
    }
}

/// Dialogue models a session can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "bedrock")]
    Bedrock,
    #[serde(rename = "grpotod")]
    Grpotod,
    #[serde(rename = "sagemaker-grpotod")]
    SagemakerGrpotod,
}

impl ModelKind {
    pub fn all() -> [ModelKind; 3] {
        [ModelKind::Bedrock, ModelKind::Grpotod, ModelKind::SagemakerGrpotod]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "bedrock" => Some(ModelKind::Bedrock),
            "grpotod" => Some(ModelKind::Grpotod),
            "sagemaker-grpotod" => Some(ModelKind::SagemakerGrpotod),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Bedrock => "bedrock",
            ModelKind::Grpotod => "grpotod",
            ModelKind::SagemakerGrpotod => "sagemaker-grpotod",
        }
    }
}

static HOTEL: DomainInfo = DomainInfo {
    name: "hotel",
    title: "Hotel Booking",
    description: "You are a helpful hotel assistant, your job is to help users in whatever queries they may have.",
    greeting: "Hello! I'm your hotel assistant. I can help you book rooms, cancel bookings, or answer general questions about our hotel. How can I assist you today?",
    intents: &[
        ("book_room", "The user wants to book a room in the hotel"),
        ("cancel_booking", "The user wants to cancel an existing booking"),
        ("general_enquiries", "The user wants to ask general questions about the hotel"),
        ("chit_chat", "Queries outside of the other intents specified"),
    ],
    slots: &[
        ("dateFrom", &["book_room"]),
        ("dateTo", &["book_room"]),
        ("bookingID", &["cancel_booking"]),
    ],
    actions: &[
        ("makeBooking", &["dateFrom", "dateTo"]),
        ("lookUpBooking", &["bookingID"]),
        ("cancellation", &["bookingID"]),
    ],
};

static RESTAURANT: DomainInfo = DomainInfo {
    name: "restaurant",
    title: "Restaurant Reservations",
    description: "You are a helpful restaurant assistant, your job is to help users with reservations and inquiries.",
    greeting: "Hello! I'm your restaurant assistant. I can help you make reservations, cancel existing ones, or answer questions about our menu. What would you like to do?",
    intents: &[
        ("make_reservation", "The user wants to make a restaurant reservation"),
        ("cancel_reservation", "The user wants to cancel an existing reservation"),
        ("menu_inquiry", "The user wants to ask about menu items or dietary options"),
        ("chit_chat", "Queries outside of the other intents specified"),
    ],
    slots: &[
        ("date", &["make_reservation"]),
        ("time", &["make_reservation"]),
        ("party_size", &["make_reservation"]),
        ("reservationID", &["cancel_reservation"]),
    ],
    actions: &[
        ("makeReservation", &["date", "time", "party_size"]),
        ("cancelReservation", &["reservationID"]),
        ("checkAvailability", &["date", "time"]),
    ],
};

static FLIGHT: DomainInfo = DomainInfo {
    name: "flight",
    title: "Flight Booking",
    description: "You are a helpful flight booking assistant, your job is to help users with flight bookings and travel inquiries.",
    greeting: "Hello! I'm your flight booking assistant. I can help you book flights, cancel bookings, or check flight status. How can I help you today?",
    intents: &[
        ("book_flight", "The user wants to book a flight"),
        ("cancel_booking", "The user wants to cancel an existing flight booking"),
        ("flight_status", "The user wants to check flight status or information"),
        ("chit_chat", "Queries outside of the other intents specified"),
    ],
    slots: &[
        ("departure_city", &["book_flight"]),
        ("arrival_city", &["book_flight"]),
        ("departure_date", &["book_flight"]),
        ("return_date", &["book_flight"]),
        ("bookingID", &["cancel_booking", "flight_status"]),
    ],
    actions: &[
        ("searchFlights", &["departure_city", "arrival_city", "departure_date"]),
        ("bookFlight", &["departure_city", "arrival_city", "departure_date"]),
        ("cancelBooking", &["bookingID"]),
        ("checkStatus", &["bookingID"]),
    ],
};

//! Customer payload and the static lookup tables it is built from.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Exclusive upper bound for customer ids.
pub const MAX_ID: u32 = 1_000_000;

pub const NAMES: [&str; 10] = [
    "Harry Potter",
    "Hermione Granger",
    "Lord Voldemort",
    "Draco Malfoy",
    "Ron Weasley",
    "Severus Snape",
    "Sirius Black",
    "Albus Dumbledore",
    "Rubeus Hagrid",
    "Ginny Weasley",
];

pub const ADDRESSES: [&str; 3] = [
    "1800 Sunset Bvd, Los Angeles",
    "200 5h Ave, New York City",
    "1600 Pennsylvania Ave NW, Washington DC",
];

/// Whatever the preference service returned, relayed untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preference(serde_json::Value);

impl From<serde_json::Value> for Preference {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl Preference {
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub preference: Option<Preference>,
}

impl Customer {
    /// Build the customer for `id`. Name and address are derived from it.
    #[must_use]
    pub fn new(id: u32, preference: Option<Preference>) -> Self {
        let idx = id as usize;
        Self {
            id,
            name: NAMES[idx % NAMES.len()].to_string(),
            address: ADDRESSES[idx % ADDRESSES.len()].to_string(),
            preference,
        }
    }

    /// Build a customer with a fresh id in `[0, MAX_ID)`.
    #[must_use]
    pub fn random(preference: Option<Preference>) -> Self {
        let id = rand::thread_rng().gen_range(0..MAX_ID);
        Self::new(id, preference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_address_follow_id() {
        for id in [0, 1, 2, 3, 9, 10, 29, 30, 123_456, MAX_ID - 1] {
            let customer = Customer::new(id, None);
            assert_eq!(customer.name, NAMES[(id % 10) as usize]);
            assert_eq!(customer.address, ADDRESSES[(id % 3) as usize]);
        }
    }

    #[test]
    fn known_ids() {
        let c = Customer::new(7, None);
        assert_eq!(c.name, "Albus Dumbledore");
        assert_eq!(c.address, "200 5h Ave, New York City");

        let c = Customer::new(999_999, None);
        assert_eq!(c.name, "Ginny Weasley");
        assert_eq!(c.address, "1800 Sunset Bvd, Los Angeles");
    }

    #[test]
    fn random_ids_stay_in_range() {
        for _ in 0..1_000 {
            let customer = Customer::random(None);
            assert!(customer.id < MAX_ID);
            assert_eq!(customer.name, NAMES[(customer.id % 10) as usize]);
            assert_eq!(customer.address, ADDRESSES[(customer.id % 3) as usize]);
        }
    }

    #[test]
    fn serializes_null_preference() {
        let json = serde_json::to_value(Customer::new(4, None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 4,
                "name": "Ron Weasley",
                "address": "200 5h Ave, New York City",
                "preference": null
            })
        );
    }

    #[test]
    fn preference_is_embedded_verbatim() {
        let pref = Preference::from(serde_json::json!({"recommendation": {"id": 3}}));
        let json = serde_json::to_value(Customer::new(0, Some(pref))).unwrap();
        assert_eq!(json["preference"], serde_json::json!({"recommendation": {"id": 3}}));
    }
}
